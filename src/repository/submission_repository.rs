use async_trait::async_trait;
use sqlx::{query, query_as, FromRow, Pool, Sqlite};
use tracing::debug;

use crate::{
    models::{types::UtcDateTime, ImageFilename, NewSubmission, Submission, SubmissionId, Token},
    repository::conversion::{DBConvertible, FromDB},
};

use super::{conversion::DBFromConversionError, SubmissionStore};

pub struct SubmissionRepository {
    pool: Pool<Sqlite>,
}

impl SubmissionRepository {
    pub fn new(pool: Pool<Sqlite>) -> SubmissionRepository {
        SubmissionRepository { pool }
    }
}

#[async_trait]
impl SubmissionStore for SubmissionRepository {
    #[tracing::instrument(skip(self, submission), fields(token = %submission.token))]
    async fn insert(&self, submission: &NewSubmission) -> Result<SubmissionId, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let query_result = {
            let token = submission.token.to_db()?;
            let created_at = submission.created_at.to_db()?;

            query(
                r#"
                    INSERT INTO submissions (name, image_filename, token, created_at)
                    VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&submission.name)
            .bind(submission.image_filename.as_ref())
            .bind(token)
            .bind(created_at)
            .execute(&mut *transaction)
            .await?
        };

        transaction.commit().await?;

        let id = SubmissionId::from_db(&query_result.last_insert_rowid())?;
        debug!("Inserted submission {id:?}");

        Ok(id)
    }

    async fn find_by_token(&self, token: &Token) -> Result<Option<Submission>, anyhow::Error> {
        let found = query_as::<_, SqlSubmission>(
            r#"
                SELECT id, name, image_filename, token, created_at
                FROM submissions
                WHERE token = $1
                LIMIT 1
            "#,
        )
        .bind(token.to_db()?)
        .fetch_optional(&self.pool)
        .await?;

        match found {
            Some(found) => Ok(Some(Submission::from_db(&found)?)),
            None => Ok(None),
        }
    }

    async fn list_all_by_created_at_desc(&self) -> Result<Vec<Submission>, anyhow::Error> {
        let rows = query_as::<_, SqlSubmission>(
            r#"
                SELECT id, name, image_filename, token, created_at
                FROM submissions
                ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let submissions = rows
            .iter()
            .map(Submission::from_db)
            .collect::<Result<Vec<Submission>, DBFromConversionError>>()?;

        Ok(submissions)
    }
}

#[derive(Debug, FromRow)]
pub struct SqlSubmission {
    id: i64,
    name: String,
    image_filename: String,
    token: String,
    created_at: String,
}

impl FromDB for Submission {
    type DBType = SqlSubmission;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Submission {
            id: SubmissionId::from_db(&value.id)?,
            name: value.name.clone(),
            image_filename: ImageFilename::from_stored(value.image_filename.clone()),
            token: Token::from_db(&value.token)?,
            created_at: UtcDateTime::from_db(&value.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use time::{macros::datetime, Duration};

    use crate::{
        database::memory_pool,
        image_types::ImageExtension,
        models::{types::UtcDateTime, ImageFilename, NewSubmission, Token},
        repository::SubmissionStore,
    };

    use super::SubmissionRepository;

    fn new_submission(name: &str, created_at: UtcDateTime) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            image_filename: ImageFilename::generate(ImageExtension::Png),
            token: Token::generate(),
            created_at,
        }
    }

    #[test(tokio::test)]
    async fn insert_then_find() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());
        let submission = new_submission("Alice", UtcDateTime::now());

        let id = repository.insert(&submission).await.unwrap();
        let found = repository
            .find_by_token(&submission.token)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.name, "Alice");
        assert_eq!(found.image_filename, submission.image_filename);
        assert_eq!(found.token, submission.token);
        assert_eq!(found.created_at, submission.created_at);
    }

    #[test(tokio::test)]
    async fn ids_increase() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());

        let first = repository
            .insert(&new_submission("A", UtcDateTime::now()))
            .await
            .unwrap();
        let second = repository
            .insert(&new_submission("B", UtcDateTime::now()))
            .await
            .unwrap();

        assert!(second.0 > first.0);
    }

    #[test(tokio::test)]
    async fn unknown_token() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());
        repository
            .insert(&new_submission("Alice", UtcDateTime::now()))
            .await
            .unwrap();

        assert!(repository
            .find_by_token(&Token::generate())
            .await
            .unwrap()
            .is_none());
    }

    #[test(tokio::test)]
    async fn duplicate_token_rejected() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());
        let first = new_submission("Alice", UtcDateTime::now());
        let mut second = new_submission("Bob", UtcDateTime::now());
        second.token = first.token.clone();

        repository.insert(&first).await.unwrap();
        assert!(repository.insert(&second).await.is_err());
    }

    #[test(tokio::test)]
    async fn listed_newest_first() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());
        let base = UtcDateTime::from(datetime!(2026-10-19 12:00 UTC));
        let shifted = |minutes: i64| {
            UtcDateTime::from(time::OffsetDateTime::from(base) + Duration::minutes(minutes))
        };

        // Inserted out of chronological order on purpose.
        for (name, minutes) in [("middle", 5), ("oldest", 0), ("newest", 10)] {
            repository
                .insert(&new_submission(name, shifted(minutes)))
                .await
                .unwrap();
        }

        let names = repository
            .list_all_by_created_at_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect::<Vec<String>>();

        assert_eq!(names, vec!["newest", "middle", "oldest"]);
    }

    #[test(tokio::test)]
    async fn equal_timestamps_fall_back_to_id() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());
        let at = UtcDateTime::now();

        repository.insert(&new_submission("first", at)).await.unwrap();
        repository.insert(&new_submission("second", at)).await.unwrap();

        let listed = repository.list_all_by_created_at_desc().await.unwrap();
        assert_eq!(listed[0].name, "second");
        assert_eq!(listed[1].name, "first");
    }

    #[test(tokio::test)]
    async fn empty_store_lists_nothing() {
        let repository = SubmissionRepository::new(memory_pool().await.unwrap());
        assert!(repository
            .list_all_by_created_at_desc()
            .await
            .unwrap()
            .is_empty());
    }
}
