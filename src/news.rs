//! News catalog served by `GET /api/news`.

use std::path::Path;

use crate::api::NewsItem;

/// Ordered, immutable list of news items.
#[derive(Debug, Clone)]
pub struct NewsCatalog {
    items: Vec<NewsItem>,
}

impl Default for NewsCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NewsCatalog {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }

    /// The catalog shipped with the service.
    pub fn builtin() -> Self {
        let entry = |title: &str, url: &str, description: &str, image: &str| NewsItem {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            image: Some(image.to_string()),
        };

        Self::new(vec![
            entry(
                "推进数字基础设施建设 加快数字经济发展",
                "https://www.bilibili.com/video/BV1zW4y1D7pJ",
                "上海启动建设数据交易所国际板，央视新闻联播报道",
                "https://i2.hdslb.com/bfs/archive/3c3a9c5e8b1c4d2f9e0d5c6b7a8f9e0d.jpg",
            ),
            entry(
                "奋进中国式现代化｜加快数字中国建设",
                "https://www.bilibili.com/video/BV1A1421f7iT",
                "为中国式现代化注入强大动力",
                "https://i1.hdslb.com/bfs/archive/2b2a8c4e7b1c3d1f8e9d4c5b6a7f8e9d.jpg",
            ),
            entry(
                "稳居世界第二！数字经济更要做强做优做大",
                "https://www.bilibili.com/video/BV1M3411y7wK",
                "主播说联播：数字经济发展新篇章",
                "https://i0.hdslb.com/bfs/archive/1a1a7c3e6b0c2d0f7e8d3c4b5a6f7e8d.jpg",
            ),
            entry(
                "三分钟解读数字经济",
                "https://www.bilibili.com/video/BV1WB4y1t7fz",
                "深入浅出解析数字经济发展趋势",
                "https://i3.hdslb.com/bfs/archive/0a0a6c2e5a9c1d9f6e7d2c3b4a5f6e7d.jpg",
            ),
            entry(
                "央视新闻：将从六个方面做大做强数字经济",
                "https://www.bilibili.com/video/BV15Ds7eFEwu",
                "全面推进数字经济高质量发展",
                "https://i2.hdslb.com/bfs/archive/9b9b5c1e4a8c0d8f5e6d1c2b3a4f5e6d.jpg",
            ),
            entry(
                "数字中国10周年！中国数字经济加速跑",
                "https://news.cctv.com/2025/04/30/ARTIlHS2FUTlWKEQF7DnGnX3250430.shtml",
                "央视网报道数字中国建设成就",
                "https://p2.img.cctvpic.com/photoworkspace/2025/04/30/2025043016223456789.jpg",
            ),
        ])
    }

    /// Load a catalog from a YAML or JSON file holding a list of items.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        // JSON documents parse as YAML too.
        let items: Vec<NewsItem> = serde_yaml::from_str(&raw)?;
        tracing::info!(
            name: "news.catalog.loaded",
            path = %path.display(),
            count = items.len(),
            "News catalog loaded from file"
        );
        Ok(Self::new(items))
    }

    /// Use `path` when given, the built-in catalog otherwise.
    pub fn from_optional_file(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog() {
        let catalog = NewsCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.items().iter().all(|i| i.url.starts_with("https://")));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- title: First\n  description: one\n  url: https://example.com/1\n\
             - title: Second\n  description: two\n  url: https://example.com/2\n  image: https://example.com/2.jpg"
        )
        .unwrap();

        let catalog = NewsCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].image, None);
        assert_eq!(
            catalog.items()[1].image.as_deref(),
            Some("https://example.com/2.jpg")
        );
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title":"A","description":"a","url":"https://example.com/a"}}]"#
        )
        .unwrap();

        let catalog = NewsCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.items()[0].title, "A");
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(NewsCatalog::from_file("/nonexistent/news.yaml").is_err());
    }
}
