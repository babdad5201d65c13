//! Tests for the article service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockArticleRepository, MockImageStore};
use crate::domain::{ArticleKind, ErrorCode};

type Service = ArticleService<MockArticleRepository, MockImageStore>;

fn make_service(repo: MockArticleRepository, images: MockImageStore) -> Service {
    ArticleService::new(Arc::new(repo), Arc::new(images))
}

fn path(file: &str) -> ImagePath {
    ImagePath::from_file_name(file).expect("fixture path")
}

fn upload(field: &str) -> UploadedImage {
    UploadedImage {
        field: field.to_owned(),
        original_name: Some("cover.png".to_owned()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

fn article(id: i32, image: Option<ImagePath>) -> Article {
    let at = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("fixture timestamp");
    Article {
        id: ArticleId::new(id),
        title: "Title".to_owned(),
        summary: "Summary".to_owned(),
        content: "<p>Body</p>".to_owned(),
        image,
        kind: ArticleKind::Article,
        featured: false,
        created_at: at,
        updated_at: at,
    }
}

fn article_from(id: i32, record: &ArticleRecord) -> Article {
    let mut out = article(id, record.image.clone());
    out.title = record.draft.title().to_owned();
    out.kind = record.draft.kind();
    out.featured = record.draft.featured();
    out
}

#[fixture]
fn draft() -> ArticleDraft {
    ArticleDraft::try_new("Title", "Summary", "<p>Body</p>").expect("fixture draft")
}

#[rstest]
#[tokio::test]
async fn create_stores_cover_before_inserting(draft: ArticleDraft) {
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .withf(|image| image.field == "image")
        .times(1)
        .return_once(|_| Ok(path("image-1-1.png")));
    images.expect_remove().never();

    let mut repo = MockArticleRepository::new();
    repo.expect_insert()
        .withf(|record| record.image.as_ref().map(ImagePath::as_str) == Some("public/uploads/image-1-1.png"))
        .times(1)
        .returning(|record| Ok(article_from(5, record)));

    let created = make_service(repo, images)
        .create(draft, Some(upload("image")))
        .await
        .expect("create succeeds");
    assert_eq!(created.id, ArticleId::new(5));
    assert_eq!(created.image, Some(path("image-1-1.png")));
}

#[rstest]
#[tokio::test]
async fn create_removes_upload_when_insert_fails(draft: ArticleDraft) {
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .return_once(|_| Ok(path("image-1-1.png")));
    images
        .expect_remove()
        .withf(|removed| removed.as_str() == "public/uploads/image-1-1.png")
        .times(1)
        .return_once(|_| Ok(()));

    let mut repo = MockArticleRepository::new();
    repo.expect_insert()
        .return_once(|_| Err(ArticlePersistenceError::connection("refused")));

    let error = make_service(repo, images)
        .create(draft, Some(upload("image")))
        .await
        .expect_err("insert failure surfaces");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn create_without_cover_skips_the_store(draft: ArticleDraft) {
    let mut images = MockImageStore::new();
    images.expect_save().never();
    let mut repo = MockArticleRepository::new();
    repo.expect_insert()
        .withf(|record| record.image.is_none())
        .returning(|record| Ok(article_from(1, record)));

    let created = make_service(repo, images)
        .create(draft.with_kind(ArticleKind::News).with_featured(true), None)
        .await
        .expect("create succeeds");
    assert_eq!(created.kind, ArticleKind::News);
    assert!(created.featured);
    assert_eq!(created.image, None);
}

#[rstest]
#[tokio::test]
async fn update_replacing_cover_deletes_old_file_after_commit(draft: ArticleDraft) {
    let mut seq = mockall::Sequence::new();
    let mut repo = MockArticleRepository::new();
    let mut images = MockImageStore::new();

    repo.expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(Some(article(3, Some(path("image-old.png"))))));
    images
        .expect_save()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(path("image-new.png")));
    repo.expect_update()
        .withf(|id, record| {
            *id == ArticleId::new(3)
                && record.image.as_ref().map(ImagePath::as_str) == Some("public/uploads/image-new.png")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|id, record| Ok(Some(article_from(id.get(), record))));
    images
        .expect_remove()
        .withf(|removed| removed.as_str() == "public/uploads/image-old.png")
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(()));

    let updated = make_service(repo, images)
        .update(ArticleId::new(3), draft, CoverChange::Replace(upload("image")))
        .await
        .expect("update succeeds");
    assert_eq!(updated.image, Some(path("image-new.png")));
}

#[rstest]
#[tokio::test]
async fn update_removing_cover_clears_image_and_deletes_file(draft: ArticleDraft) {
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(article(3, Some(path("image-old.png"))))));
    repo.expect_update()
        .withf(|_, record| record.image.is_none())
        .returning(|id, record| Ok(Some(article_from(id.get(), record))));
    let mut images = MockImageStore::new();
    images.expect_save().never();
    images
        .expect_remove()
        .withf(|removed| removed.as_str() == "public/uploads/image-old.png")
        .times(1)
        .return_once(|_| Ok(()));

    let updated = make_service(repo, images)
        .update(ArticleId::new(3), draft, CoverChange::Remove)
        .await
        .expect("update succeeds");
    assert_eq!(updated.image, None);
}

#[rstest]
#[tokio::test]
async fn update_keeping_cover_touches_no_files(draft: ArticleDraft) {
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(article(3, Some(path("image-old.png"))))));
    repo.expect_update()
        .withf(|_, record| record.image.as_ref().map(ImagePath::as_str) == Some("public/uploads/image-old.png"))
        .returning(|id, record| Ok(Some(article_from(id.get(), record))));
    let mut images = MockImageStore::new();
    images.expect_save().never();
    images.expect_remove().never();

    let updated = make_service(repo, images)
        .update(ArticleId::new(3), draft, CoverChange::Keep)
        .await
        .expect("update succeeds");
    assert_eq!(updated.image, Some(path("image-old.png")));
}

#[rstest]
#[tokio::test]
async fn failed_commit_removes_new_file_and_keeps_old(draft: ArticleDraft) {
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(article(3, Some(path("image-old.png"))))));
    repo.expect_update()
        .return_once(|_, _| Err(ArticlePersistenceError::query("deadlock")));
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .return_once(|_| Ok(path("image-new.png")));
    images
        .expect_remove()
        .withf(|removed| removed.as_str() == "public/uploads/image-new.png")
        .times(1)
        .return_once(|_| Ok(()));

    let error = make_service(repo, images)
        .update(ArticleId::new(3), draft, CoverChange::Replace(upload("image")))
        .await
        .expect_err("commit failure surfaces");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_article_stores_nothing(draft: ArticleDraft) {
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_update().never();
    let mut images = MockImageStore::new();
    images.expect_save().never();

    let error = make_service(repo, images)
        .update(ArticleId::new(9), draft, CoverChange::Replace(upload("image")))
        .await
        .expect_err("missing article");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Ok(()))]
#[case(Err(ImageStoreError::io("permission denied")))]
#[tokio::test]
async fn delete_removes_cover_best_effort(#[case] removal: Result<(), ImageStoreError>) {
    let mut repo = MockArticleRepository::new();
    repo.expect_delete()
        .return_once(|_| Ok(Some(article(4, Some(path("image-4.png"))))));
    let mut images = MockImageStore::new();
    images
        .expect_remove()
        .withf(|removed| removed.as_str() == "public/uploads/image-4.png")
        .times(1)
        .return_once(move |_| removal);

    make_service(repo, images)
        .delete(ArticleId::new(4))
        .await
        .expect("delete succeeds regardless of file removal");
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_article_is_not_found() {
    let mut repo = MockArticleRepository::new();
    repo.expect_delete().return_once(|_| Ok(None));
    let mut images = MockImageStore::new();
    images.expect_remove().never();

    let error = make_service(repo, images)
        .delete(ArticleId::new(4))
        .await
        .expect_err("missing article");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn rejected_upload_is_a_validation_error(draft: ArticleDraft) {
    let repo = MockArticleRepository::new();
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .return_once(|_| Err(ImageStoreError::rejected("file is empty")));

    let error = make_service(repo, images)
        .create(draft, Some(upload("image")))
        .await
        .expect_err("rejected upload");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("image"))
    );
}

#[rstest]
#[tokio::test]
async fn list_passes_the_filter_through() {
    let mut repo = MockArticleRepository::new();
    repo.expect_list()
        .withf(|filter| filter.kind == Some(ArticleKind::News) && filter.featured.is_none())
        .return_once(|_| Ok(vec![article(2, None), article(1, None)]));

    let listed = make_service(repo, MockImageStore::new())
        .list(&ArticleFilter::of_kind(ArticleKind::News))
        .await
        .expect("list succeeds");
    assert_eq!(listed.len(), 2);
}
