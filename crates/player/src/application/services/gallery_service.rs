//! Gallery Service - lore articles, comments, media, and their folders.
//!
//! Folder filtering goes through the `folder_id` query parameter held in
//! the [`GallerySession`]; list payloads tolerate every wrapper the
//! backend has used.

use std::sync::Arc;

use serde_json::json;

use vellum_shared::{unwrap_list, Folder, LoreArticle, LoreComment, MediaItem};

use crate::application::error::{parse_value, ServiceError};
use crate::ports::{FileUpload, HttpPort, UploadPart};
use crate::session::GallerySession;

const LORE_ARTICLES_PATH: &str = "/api/art/lore/articles";
const LORE_FOLDERS_PATH: &str = "/api/art/lore/folders";
const MEDIA_PATH: &str = "/api/art/media";
const MEDIA_FOLDERS_PATH: &str = "/api/art/media/folders";

/// A new article as composed in the publish form.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub folder_id: Option<i64>,
    pub cover: Option<FileUpload>,
    pub gallery: Vec<FileUpload>,
}

/// A new media asset as composed in the upload form.
#[derive(Debug, Clone)]
pub struct MediaDraft {
    pub title: String,
    pub description: String,
    pub kind: String,
    pub folder_id: Option<i64>,
    pub file: FileUpload,
}

#[derive(Clone)]
pub struct GalleryService {
    api: Arc<dyn HttpPort>,
}

impl GalleryService {
    pub fn new(api: Arc<dyn HttpPort>) -> Self {
        Self { api }
    }

    // --- lore folders ---

    pub async fn lore_folders(&self) -> Result<Vec<Folder>, ServiceError> {
        Ok(unwrap_list(self.api.get_json(LORE_FOLDERS_PATH).await?))
    }

    pub async fn create_lore_folder(&self, title: &str) -> Result<(), ServiceError> {
        self.api
            .post_json(LORE_FOLDERS_PATH, &json!({ "title": title }))
            .await?;
        Ok(())
    }

    pub async fn delete_lore_folder(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self
            .api
            .delete(&format!("{LORE_FOLDERS_PATH}/{id}/"))
            .await?)
    }

    // --- articles ---

    pub async fn articles(&self, session: &GallerySession) -> Result<Vec<LoreArticle>, ServiceError> {
        let path = match session.lore_folder {
            Some(folder) => format!("{LORE_ARTICLES_PATH}?folder_id={folder}"),
            None => LORE_ARTICLES_PATH.to_string(),
        };
        Ok(unwrap_list(self.api.get_json(&path).await?))
    }

    pub async fn article(&self, id: i64) -> Result<LoreArticle, ServiceError> {
        let value = self
            .api
            .get_json(&format!("{LORE_ARTICLES_PATH}/{id}/"))
            .await?;
        // Detail responses wrap the record in {"item": ...}
        let item = value.get("item").cloned().unwrap_or(value);
        parse_value(item)
    }

    pub async fn publish_article(&self, draft: ArticleDraft) -> Result<(), ServiceError> {
        let mut parts = vec![
            UploadPart::text("title", draft.title),
            UploadPart::text("content", draft.content),
        ];
        if let Some(folder) = draft.folder_id {
            parts.push(UploadPart::text("folder", folder.to_string()));
        }
        if let Some(cover) = draft.cover {
            parts.push(UploadPart::file("cover", cover.file_name, cover.mime, cover.bytes));
        }
        for image in draft.gallery {
            parts.push(UploadPart::file(
                "gallery",
                image.file_name,
                image.mime,
                image.bytes,
            ));
        }
        self.api.post_multipart(LORE_ARTICLES_PATH, parts).await?;
        Ok(())
    }

    pub async fn delete_article(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self
            .api
            .delete(&format!("{LORE_ARTICLES_PATH}/{id}/"))
            .await?)
    }

    // --- comments ---

    pub async fn comments(&self, article_id: i64) -> Result<Vec<LoreComment>, ServiceError> {
        let path = format!("{LORE_ARTICLES_PATH}/{article_id}/comments");
        Ok(unwrap_list(self.api.get_json(&path).await?))
    }

    pub async fn add_comment(&self, article_id: i64, content: &str) -> Result<(), ServiceError> {
        let path = format!("{LORE_ARTICLES_PATH}/{article_id}/comments");
        self.api.post_json(&path, &json!({ "content": content })).await?;
        Ok(())
    }

    // --- media ---

    pub async fn media(
        &self,
        session: &GallerySession,
        kind: Option<&str>,
    ) -> Result<Vec<MediaItem>, ServiceError> {
        let mut query = Vec::new();
        if let Some(kind) = kind {
            query.push(format!("kind={kind}"));
        }
        if let Some(folder) = session.media_folder {
            query.push(format!("folder_id={folder}"));
        }
        let path = if query.is_empty() {
            MEDIA_PATH.to_string()
        } else {
            format!("{MEDIA_PATH}?{}", query.join("&"))
        };
        Ok(unwrap_list(self.api.get_json(&path).await?))
    }

    pub async fn upload_media(&self, draft: MediaDraft) -> Result<(), ServiceError> {
        let mut parts = vec![
            UploadPart::text("title", draft.title),
            UploadPart::text("description", draft.description),
            UploadPart::text("kind", draft.kind),
        ];
        if let Some(folder) = draft.folder_id {
            parts.push(UploadPart::text("folder", folder.to_string()));
        }
        parts.push(UploadPart::file(
            "file",
            draft.file.file_name,
            draft.file.mime,
            draft.file.bytes,
        ));
        self.api.post_multipart(MEDIA_PATH, parts).await?;
        Ok(())
    }

    pub async fn delete_media(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.api.delete(&format!("{MEDIA_PATH}/{id}/")).await?)
    }

    // --- media folders ---

    pub async fn media_folders(&self) -> Result<Vec<Folder>, ServiceError> {
        Ok(unwrap_list(self.api.get_json(MEDIA_FOLDERS_PATH).await?))
    }

    pub async fn create_media_folder(&self, title: &str) -> Result<(), ServiceError> {
        self.api
            .post_json(MEDIA_FOLDERS_PATH, &json!({ "title": title }))
            .await?;
        Ok(())
    }

    pub async fn delete_media_folder(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self
            .api
            .delete(&format!("{MEDIA_FOLDERS_PATH}/{id}/"))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::Value;

    use crate::ports::ApiError;

    #[derive(Default)]
    struct FakeApi {
        log: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, method: &str, path: &str) {
            self.log.lock().unwrap().push(format!("{method} {path}"));
        }
    }

    #[async_trait::async_trait]
    impl HttpPort for FakeApi {
        async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
            self.record("GET", path);
            if path.starts_with(LORE_ARTICLES_PATH) && path.ends_with('/') {
                return Ok(serde_json::json!({"item": {"id": 3, "title": "The Sunken Keep"}}));
            }
            Ok(serde_json::json!({"items": []}))
        }

        async fn post_json(&self, path: &str, _: &Value) -> Result<Value, ApiError> {
            self.record("POST", path);
            Ok(Value::Null)
        }

        async fn patch_json(&self, _: &str, _: &Value) -> Result<Value, ApiError> {
            unreachable!("gallery never patches")
        }

        async fn delete(&self, path: &str) -> Result<(), ApiError> {
            self.record("DELETE", path);
            Ok(())
        }

        async fn post_multipart(&self, path: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            self.record("POST-MULTIPART", path);
            Ok(Value::Null)
        }

        async fn patch_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!("gallery never patch-uploads")
        }
    }

    fn service() -> (GalleryService, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::default());
        (GalleryService::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_articles_folder_filter() {
        let (service, api) = service();
        let mut session = GallerySession::new();

        service.articles(&session).await.unwrap();
        session.lore_folder = Some(4);
        service.articles(&session).await.unwrap();

        assert_eq!(
            api.log.lock().unwrap().as_slice(),
            [
                "GET /api/art/lore/articles",
                "GET /api/art/lore/articles?folder_id=4",
            ]
        );
    }

    #[tokio::test]
    async fn test_article_unwraps_item() {
        let (service, _) = service();
        let article = service.article(3).await.unwrap();
        assert_eq!(article.title, "The Sunken Keep");
    }

    #[tokio::test]
    async fn test_media_query_combines_filters() {
        let (service, api) = service();
        let mut session = GallerySession::new();
        session.media_folder = Some(2);

        service.media(&session, Some("image")).await.unwrap();

        assert_eq!(
            api.log.lock().unwrap().as_slice(),
            ["GET /api/art/media?kind=image&folder_id=2"]
        );
    }

    #[tokio::test]
    async fn test_comment_paths() {
        let (service, api) = service();
        service.comments(3).await.unwrap();
        service.add_comment(3, "love this").await.unwrap();
        assert_eq!(
            api.log.lock().unwrap().as_slice(),
            [
                "GET /api/art/lore/articles/3/comments",
                "POST /api/art/lore/articles/3/comments",
            ]
        );
    }

    #[tokio::test]
    async fn test_folder_crud_paths() {
        let (service, api) = service();
        service.create_lore_folder("Maps").await.unwrap();
        service.delete_lore_folder(5).await.unwrap();
        service.create_media_folder("Themes").await.unwrap();
        service.delete_media_folder(6).await.unwrap();
        assert_eq!(
            api.log.lock().unwrap().as_slice(),
            [
                "POST /api/art/lore/folders",
                "DELETE /api/art/lore/folders/5/",
                "POST /api/art/media/folders",
                "DELETE /api/art/media/folders/6/",
            ]
        );
    }
}
