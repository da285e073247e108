//! PostgreSQL repository implementations.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use blogly_core::domain::{NewPost, NewTag, NewUser, Post, PostTag, Tag, User};
use blogly_core::error::RepoError;
use blogly_core::ports::{PostRepository, PostTagRepository, TagRepository, UserRepository};
use blogly_core::reconcile::TagChanges;

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err, map_delete_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL post/tag join repository.
pub type PostgresPostTagRepository = PostgresBaseRepository<PostTagEntity>;

async fn insert_link<C: ConnectionTrait>(db: &C, link: PostTag) -> Result<(), RepoError> {
    PostTagEntity::insert(post_tag::ActiveModel::from(link))
        .exec_without_returning(db)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

async fn delete_link<C: ConnectionTrait>(db: &C, link: PostTag) -> Result<(), RepoError> {
    let result = PostTagEntity::delete_by_id((link.post_id, link.tag_id))
        .exec(db)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected == 0 {
        return Err(RepoError::NotFound);
    }
    Ok(())
}

/// Removals first, then additions, on whatever connection or transaction
/// the caller holds.
async fn apply_links<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
    changes: &TagChanges,
) -> Result<(), RepoError> {
    for &tag_id in &changes.to_remove {
        delete_link(db, PostTag { post_id, tag_id }).await?;
    }
    for &tag_id in &changes.to_add {
        insert_link(db, PostTag { post_id, tag_id }).await?;
    }
    Ok(())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let NewPost {
            user_id,
            title,
            content,
            created_at,
            tag_ids,
        } = post;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel {
            user_id: sea_orm::Set(user_id),
            title: sea_orm::Set(title),
            content: sea_orm::Set(content),
            created_at: sea_orm::Set(created_at.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        for tag_id in tag_ids {
            insert_link(
                &txn,
                PostTag {
                    post_id: model.id,
                    tag_id,
                },
            )
            .await?;
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = model.id, "Inserted post row");

        Ok(model.into())
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_with_tags(&self, post: Post, changes: &TagChanges) -> Result<Post, RepoError> {
        let post_id = post.id;
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(map_db_err)?;
        apply_links(&txn, post_id, changes).await?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id, "Updated post row and tag links");

        Ok(model.into())
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let links = PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        let deleted = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_delete_err)?;
        if deleted.rows_affected == 0 {
            // Dropping the transaction rolls the link deletions back.
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(links)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn insert(&self, tag: NewTag) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel::from(tag)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(tag_id = model.id, "Inserted tag row");
        Ok(model.into())
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let links = PostTagEntity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        let deleted = TagEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_delete_err)?;
        if deleted.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(links)
    }
}

#[async_trait]
impl PostTagRepository for PostgresPostTagRepository {
    async fn tag_ids_for_post(&self, post_id: i32) -> Result<BTreeSet<i32>, RepoError> {
        let result = PostTagEntity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(|link| link.tag_id).collect())
    }

    async fn post_ids_for_tag(&self, tag_id: i32) -> Result<BTreeSet<i32>, RepoError> {
        let result = PostTagEntity::find()
            .filter(post_tag::Column::TagId.eq(tag_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(|link| link.post_id).collect())
    }

    async fn insert(&self, link: PostTag) -> Result<(), RepoError> {
        insert_link(&self.db, link).await
    }

    async fn delete(&self, link: PostTag) -> Result<(), RepoError> {
        delete_link(&self.db, link).await
    }

    async fn apply(&self, post_id: i32, changes: &TagChanges) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        apply_links(&txn, post_id, changes).await?;
        txn.commit().await.map_err(map_db_err)
    }
}
