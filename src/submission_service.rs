use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::body::Bytes;
use tokio::fs;
use tracing::{error, info};

use crate::{
    error::AppError,
    image_types::ImageExtension,
    models::{types::UtcDateTime, ImageFilename, NewSubmission, Token},
    repository::SubmissionStore,
    utils::qr_code,
};

/// A submission that passed form validation.
pub struct ValidSubmission {
    pub name: String,
    pub extension: ImageExtension,
    pub bytes: Bytes,
}

/// Turns validated submissions into a stored image, a QR code and a record.
///
/// The steps run in order and each one may fail:
///
/// 1. the upload is written to the upload directory;
/// 2. the QR code for the reward URL is written to the rewards directory;
/// 3. the record is inserted.
///
/// Nothing is rolled back. If step 2 or 3 fails, the files written before it
/// stay on disk without a record pointing at them.
pub struct SubmissionService {
    submissions: Arc<dyn SubmissionStore>,
    upload_dir: PathBuf,
    rewards_dir: PathBuf,
}

impl SubmissionService {
    pub fn new(
        submissions: Arc<dyn SubmissionStore>,
        upload_dir: PathBuf,
        rewards_dir: PathBuf,
    ) -> SubmissionService {
        SubmissionService {
            submissions,
            upload_dir,
            rewards_dir,
        }
    }

    pub async fn prepare_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.upload_dir).await?;
        fs::create_dir_all(&self.rewards_dir).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(name = %submission.name))]
    pub async fn submit(
        &self,
        submission: ValidSubmission,
        base_url: &str,
    ) -> Result<Token, AppError> {
        let image_filename = ImageFilename::generate(submission.extension);
        let image_path = self.upload_dir.join(image_filename.as_ref());
        fs::write(&image_path, &submission.bytes).await?;

        let token = Token::generate();
        let reward_url = format!("{base_url}/reward/{token}");

        let qr_path = self.rewards_dir.join(token.qr_filename());
        if let Err(err) = write_qr_code(&qr_path, &reward_url).await {
            error!("Could not create QR code, leaving {image_path:?} orphaned: {err}");
            return Err(err);
        }

        let new_submission = NewSubmission {
            name: submission.name,
            image_filename,
            token,
            created_at: UtcDateTime::now(),
        };

        if let Err(err) = self.submissions.insert(&new_submission).await {
            error!(
                "Could not store submission, leaving {image_path:?} and {qr_path:?} orphaned: {err}"
            );
            return Err(err.into());
        }

        info!(
            "Accepted submission {} with image {}",
            new_submission.token, new_submission.image_filename
        );

        Ok(new_submission.token)
    }
}

async fn write_qr_code(path: &Path, reward_url: &str) -> Result<(), AppError> {
    let png = qr_code::render_png(reward_url)?;
    fs::write(path, png).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, sync::Arc};

    use async_trait::async_trait;
    use axum::body::Bytes;
    use test_log::test;
    use uuid::Uuid;

    use crate::{
        database::memory_pool,
        error::AppError,
        image_types::ImageExtension,
        models::{NewSubmission, Submission, SubmissionId, Token},
        repository::{SubmissionRepository, SubmissionStore},
    };

    use super::{SubmissionService, ValidSubmission};

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("reward-wall-service-{}", Uuid::new_v4().simple()))
    }

    fn cat_png() -> ValidSubmission {
        ValidSubmission {
            name: "Alice".to_string(),
            extension: ImageExtension::Png,
            bytes: Bytes::from_static(b"cat pixels"),
        }
    }

    struct FailingStore;

    #[async_trait]
    impl SubmissionStore for FailingStore {
        async fn insert(&self, _: &NewSubmission) -> Result<SubmissionId, anyhow::Error> {
            Err(anyhow::anyhow!("store unavailable"))
        }

        async fn find_by_token(&self, _: &Token) -> Result<Option<Submission>, anyhow::Error> {
            Ok(None)
        }

        async fn list_all_by_created_at_desc(&self) -> Result<Vec<Submission>, anyhow::Error> {
            Ok(vec![])
        }
    }

    #[test(tokio::test)]
    async fn writes_image_qr_and_record() {
        let root = temp_root();
        let store = Arc::new(SubmissionRepository::new(memory_pool().await.unwrap()));
        let service = SubmissionService::new(store.clone(), root.join("u"), root.join("r"));
        service.prepare_directories().await.unwrap();

        let token = service
            .submit(cat_png(), "http://wall.test")
            .await
            .unwrap();

        let stored = store.find_by_token(&token).await.unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
        assert!(stored.image_filename.as_ref().ends_with(".png"));

        let image = std::fs::read(root.join("u").join(stored.image_filename.as_ref())).unwrap();
        assert_eq!(image, b"cat pixels");
        assert!(root.join("r").join(token.qr_filename()).is_file());
    }

    #[test(tokio::test)]
    async fn store_failure_leaves_files_behind() {
        let root = temp_root();
        let service = SubmissionService::new(Arc::new(FailingStore), root.join("u"), root.join("r"));
        service.prepare_directories().await.unwrap();

        assert!(service.submit(cat_png(), "http://wall.test").await.is_err());

        assert_eq!(std::fs::read_dir(root.join("u")).unwrap().count(), 1);
        assert_eq!(std::fs::read_dir(root.join("r")).unwrap().count(), 1);
    }

    #[test(tokio::test)]
    async fn unrenderable_reward_url_leaves_only_the_upload() {
        let root = temp_root();
        let store = Arc::new(SubmissionRepository::new(memory_pool().await.unwrap()));
        let service = SubmissionService::new(store.clone(), root.join("u"), root.join("r"));
        service.prepare_directories().await.unwrap();

        let base_url = format!("http://{}", "x".repeat(8000));
        assert!(matches!(
            service.submit(cat_png(), &base_url).await,
            Err(AppError::QrCode(_))
        ));

        assert_eq!(std::fs::read_dir(root.join("u")).unwrap().count(), 1);
        assert_eq!(std::fs::read_dir(root.join("r")).unwrap().count(), 0);
        assert!(store.list_all_by_created_at_desc().await.unwrap().is_empty());
    }

    #[test(tokio::test)]
    async fn missing_directory_fails_before_insert() {
        let root = temp_root();
        let store = Arc::new(SubmissionRepository::new(memory_pool().await.unwrap()));
        let service = SubmissionService::new(store.clone(), root.join("u"), root.join("r"));

        assert!(service.submit(cat_png(), "http://wall.test").await.is_err());
        assert!(store.list_all_by_created_at_desc().await.unwrap().is_empty());
    }
}
