use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{CountryCode, NewsArticle, NewsInfo};

use super::{NewsProvider, fetch_json};

const BASE_URL: &str = "https://newsapi.org/v2";

/// Top headlines per country from NewsAPI.
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    api_key: String,
    http: Client,
}

impl NewsApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct NaSource {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaArticle {
    #[serde(default)]
    source: Option<NaSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<NaArticle>,
}

impl From<NaArticle> for NewsArticle {
    fn from(a: NaArticle) -> Self {
        let source = a.source.unwrap_or_default();

        NewsArticle {
            id: source.id,
            name: source.name,
            author: a.author,
            title: a.title,
            description: a.description,
            url: a.url,
            published_at: a.published_at,
            content: a.content,
        }
    }
}

impl TryFrom<NaResponse> for NewsInfo {
    type Error = anyhow::Error;

    fn try_from(parsed: NaResponse) -> Result<Self> {
        if parsed.status != "ok" {
            return Err(anyhow!(
                "NewsAPI returned status '{}': {}",
                parsed.status,
                parsed.message.as_deref().unwrap_or("no details")
            ));
        }

        let articles = parsed.articles.into_iter().map(NewsArticle::from);
        Ok(NewsInfo::new(parsed.total_results, articles))
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    #[tracing::instrument(name = "get_news", level = "debug", skip(self))]
    async fn get_news(&self, country: &CountryCode) -> Result<NewsInfo> {
        let country = country.as_str().to_lowercase();

        let request = self
            .http
            .get(format!("{BASE_URL}/top-headlines"))
            .query(&[
                ("country", country.as_str()),
                ("apiKey", self.api_key.as_str()),
            ]);

        let parsed: NaResponse = fetch_json(request, "NewsAPI top headlines").await?;
        NewsInfo::try_from(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADLINES: &str = r#"{
        "status": "ok",
        "totalResults": 38,
        "articles": [
            {
                "source": {"id": "google-news", "name": "Google News"},
                "author": "The Guardian",
                "title": "UK economy rebounds with 0.3% growth in January",
                "description": null,
                "url": "link",
                "urlToImage": null,
                "publishedAt": "2023-03-10T10:44:52Z",
                "content": "content"
            },
            {
                "source": {"id": "google-news", "name": "Google News"},
                "author": "The Guardian",
                "title": "UK economy rebounds with 0.3% growth in January",
                "description": null,
                "url": "link",
                "urlToImage": null,
                "publishedAt": "2023-03-10T10:44:52Z",
                "content": "content"
            },
            {
                "source": {"id": null, "name": "BBC News"},
                "author": null,
                "title": "Markets wobble",
                "description": "desc",
                "url": "other",
                "publishedAt": "2023-03-10T09:00:00Z",
                "content": null
            }
        ]
    }"#;

    #[test]
    fn maps_headlines_and_deduplicates_articles() {
        let parsed: NaResponse = serde_json::from_str(HEADLINES).expect("fixture parses");
        let news = NewsInfo::try_from(parsed).expect("ok response");

        assert_eq!(news.total_results, 38);
        assert_eq!(news.articles.len(), 2);

        let guardian = news
            .articles
            .iter()
            .find(|a| a.author.as_deref() == Some("The Guardian"))
            .expect("guardian article present");
        assert_eq!(guardian.id.as_deref(), Some("google-news"));
        assert_eq!(guardian.name.as_deref(), Some("Google News"));
        assert_eq!(guardian.published_at.as_deref(), Some("2023-03-10T10:44:52Z"));
        assert_eq!(guardian.description, None);
    }

    #[test]
    fn error_status_is_an_error() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let parsed: NaResponse = serde_json::from_str(json).expect("fixture parses");

        let err = NewsInfo::try_from(parsed).unwrap_err();
        assert!(err.to_string().contains("Your API key is invalid."));
    }
}
