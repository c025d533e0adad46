use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use super::ActivityStore;
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::domain::entities::activities::UserActivity;

const COLLECTION: &str = "user_activities";

pub struct ActivityRepository {
    db: Arc<Database>,
}

impl ActivityRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<UserActivity> {
        self.db.get_database().collection(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let user_timeline = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_timeline".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_index(user_timeline)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn insert(&self, activity: &UserActivity) -> AppResult<()> {
        self.collection()
            .insert_one(activity)
            .await?;

        Ok(())
    }

    async fn find_recent_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<UserActivity>> {
        let cursor = self
            .collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }
}
