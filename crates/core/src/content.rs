//! Content items — the two editorial record kinds a feed is built from.
//!
//! Articles and campaign-reviews are separate records in the store but share
//! the fields the feed engine cares about. [`ContentItem`] is the sum type the
//! engine works with; merging and sorting only ever look at the common fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Discriminant of a [`ContentItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Article,
    CampaignReview,
}

impl ContentKind {
    /// Stable wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::CampaignReview => "campaign_review",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Self::Article),
            "campaign_review" => Ok(Self::CampaignReview),
            other => Err(format!("unknown content kind '{other}'")),
        }
    }
}

/// A long-form editorial article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sponsored: bool,
    /// Only meaningful when `sponsored` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsored_label: Option<String>,
}

/// A campaign-review post. Campaign-reviews carry no category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReview {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sponsored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsored_label: Option<String>,
}

impl Article {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company_id: None,
            category_id: None,
            created_at,
            sponsored: false,
            sponsored_label: None,
        }
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Mark as sponsored, optionally with a display label.
    pub fn sponsored(mut self, label: Option<String>) -> Self {
        self.sponsored = true;
        self.sponsored_label = label;
        self
    }
}

impl CampaignReview {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company_id: None,
            created_at,
            sponsored: false,
            sponsored_label: None,
        }
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    /// Mark as sponsored, optionally with a display label.
    pub fn sponsored(mut self, label: Option<String>) -> Self {
        self.sponsored = true;
        self.sponsored_label = label;
        self
    }
}

/// A feed candidate of either kind.
///
/// Serialized with an internal `type` tag, e.g.
/// `{"type": "campaign_review", "id": "42", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Article(Article),
    CampaignReview(CampaignReview),
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Article(_) => ContentKind::Article,
            Self::CampaignReview(_) => ContentKind::CampaignReview,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Article(a) => &a.id,
            Self::CampaignReview(r) => &r.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Article(a) => &a.title,
            Self::CampaignReview(r) => &r.title,
        }
    }

    pub fn company_id(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.company_id.as_deref(),
            Self::CampaignReview(r) => r.company_id.as_deref(),
        }
    }

    /// Always `None` for campaign-reviews.
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.category_id.as_deref(),
            Self::CampaignReview(_) => None,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Article(a) => a.created_at,
            Self::CampaignReview(r) => r.created_at,
        }
    }

    pub fn is_sponsored(&self) -> bool {
        match self {
            Self::Article(a) => a.sponsored,
            Self::CampaignReview(r) => r.sponsored,
        }
    }

    /// The sponsor label; never returned for organic items.
    pub fn sponsored_label(&self) -> Option<&str> {
        let label = match self {
            Self::Article(a) => a.sponsored_label.as_deref(),
            Self::CampaignReview(r) => r.sponsored_label.as_deref(),
        };
        label.filter(|_| self.is_sponsored())
    }

    /// Drop a label left on an organic item so the stored record satisfies
    /// "label only when sponsored".
    pub fn normalized(mut self) -> Self {
        match &mut self {
            Self::Article(a) if !a.sponsored => a.sponsored_label = None,
            Self::CampaignReview(r) if !r.sponsored => r.sponsored_label = None,
            _ => {}
        }
        self
    }

    /// Total recency order: newest `created_at` first, then `id` descending,
    /// then kind. Items that compare `Equal` are the same record.
    pub fn newest_first(a: &ContentItem, b: &ContentItem) -> Ordering {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(a.id()))
            .then_with(|| a.kind().cmp(&b.kind()))
    }
}

impl From<Article> for ContentItem {
    fn from(article: Article) -> Self {
        Self::Article(article)
    }
}

impl From<CampaignReview> for ContentItem {
    fn from(review: CampaignReview) -> Self {
        Self::CampaignReview(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn serializes_with_type_tag() {
        let item: ContentItem = Article::new("a1", "Launch notes", at(10))
            .with_company("acme")
            .sponsored(Some("Partner".into()))
            .into();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "article");
        assert_eq!(json["company_id"], "acme");
        assert_eq!(json["sponsored_label"], "Partner");
        assert!(json.get("category_id").is_none());
    }

    #[test]
    fn review_deserializes_from_wire_shape() {
        let json = r#"{
            "type": "campaign_review",
            "id": "r7",
            "title": "Spring campaign",
            "company_id": null,
            "created_at": "2024-03-01T12:00:00Z"
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), ContentKind::CampaignReview);
        assert_eq!(item.id(), "r7");
        assert!(!item.is_sponsored());
        assert_eq!(item.category_id(), None);
    }

    #[test]
    fn label_hidden_on_organic_items() {
        let mut article = Article::new("a1", "t", at(1));
        article.sponsored_label = Some("stale".into());
        let item = ContentItem::from(article);
        assert_eq!(item.sponsored_label(), None);

        let ContentItem::Article(normalized) = item.normalized() else {
            panic!("kind changed");
        };
        assert!(normalized.sponsored_label.is_none());
    }

    #[test]
    fn newest_first_breaks_ties_by_id_descending() {
        let older: ContentItem = Article::new("z", "t", at(5)).into();
        let newer: ContentItem = Article::new("a", "t", at(9)).into();
        let tie_low: ContentItem = CampaignReview::new("b", "t", at(9)).into();

        let mut items = vec![older.clone(), tie_low.clone(), newer.clone()];
        items.sort_by(ContentItem::newest_first);
        assert_eq!(items, vec![tie_low, newer, older]);
    }

    #[test]
    fn newest_first_orders_same_id_by_kind() {
        let article: ContentItem = Article::new("7", "t", at(3)).into();
        let review: ContentItem = CampaignReview::new("7", "t", at(3)).into();
        assert_eq!(ContentItem::newest_first(&article, &review), Ordering::Less);
    }

    #[test]
    fn kind_parses_storage_names() {
        assert_eq!("article".parse::<ContentKind>(), Ok(ContentKind::Article));
        assert_eq!(
            "campaign_review".parse::<ContentKind>(),
            Ok(ContentKind::CampaignReview)
        );
        assert!("video".parse::<ContentKind>().is_err());
    }
}
