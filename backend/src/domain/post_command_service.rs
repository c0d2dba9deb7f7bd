//! Post and comment write use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AddCommentOutcome, CommentRepository, CreatePostOutcome, EditFormOutcome, EditPostOutcome,
    GroupRepository, MediaStorage, PostCommand, PostRepository,
};
use crate::domain::{
    CommentText, Error, ImagePath, ImageUpload, NewComment, NewPost, Post, PostChanges, PostForm,
    PostId, PostSubmission, UserId, ValidPost,
};

/// Repositories and adapters the write side depends on.
#[derive(Clone)]
pub struct PostCommandDependencies {
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub media: Arc<dyn MediaStorage>,
    pub clock: Arc<dyn Clock>,
}

/// Domain service implementing [`PostCommand`].
#[derive(Clone)]
pub struct PostCommandService {
    deps: PostCommandDependencies,
}

impl PostCommandService {
    pub fn new(deps: PostCommandDependencies) -> Self {
        Self { deps }
    }

    async fn existing_post(&self, id: PostId) -> Result<Post, Error> {
        self.deps
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("no post with id {id}")))
    }

    async fn validate(&self, submission: PostSubmission) -> Result<Result<ValidPost, PostForm>, Error> {
        let groups = self.deps.groups.list().await?;
        Ok(submission.validate(&groups))
    }

    async fn store_image(&self, upload: Option<&ImageUpload>) -> Result<Option<ImagePath>, Error> {
        match upload {
            Some(upload) => Ok(Some(self.deps.media.store_image(upload).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PostCommand for PostCommandService {
    async fn create_post(
        &self,
        author: UserId,
        submission: PostSubmission,
    ) -> Result<CreatePostOutcome, Error> {
        let valid = match self.validate(submission).await? {
            Ok(valid) => valid,
            Err(form) => return Ok(CreatePostOutcome::Invalid(form)),
        };
        let image = self.store_image(valid.image.as_ref()).await?;
        let post = self
            .deps
            .posts
            .create(&NewPost {
                author,
                text: valid.text,
                group: valid.group,
                image,
                pub_date: self.deps.clock.utc(),
            })
            .await?;
        info!(post_id = %post.id(), author = %author, "post created");
        Ok(CreatePostOutcome::Created(post))
    }

    async fn edit_form(&self, editor: UserId, id: PostId) -> Result<EditFormOutcome, Error> {
        let post = self.existing_post(id).await?;
        if !post.is_authored_by(&editor) {
            return Ok(EditFormOutcome::NotAuthor);
        }
        Ok(EditFormOutcome::Editable(PostForm::for_post(&post)))
    }

    async fn edit_post(
        &self,
        editor: UserId,
        id: PostId,
        submission: PostSubmission,
    ) -> Result<EditPostOutcome, Error> {
        let post = self.existing_post(id).await?;
        if !post.is_authored_by(&editor) {
            info!(post_id = %id, editor = %editor, "ignoring edit by non-author");
            return Ok(EditPostOutcome::NotAuthor);
        }
        let valid = match self.validate(submission).await? {
            Ok(valid) => valid,
            Err(form) => return Ok(EditPostOutcome::Invalid(form)),
        };
        let image = match self.store_image(valid.image.as_ref()).await? {
            Some(stored) => Some(stored),
            None => post.image().cloned(),
        };
        let changes = PostChanges {
            text: valid.text,
            group: valid.group,
            image,
        };
        let updated = self
            .deps
            .posts
            .update(id, &changes)
            .await?
            .ok_or_else(|| Error::not_found(format!("no post with id {id}")))?;
        info!(post_id = %id, "post updated");
        Ok(EditPostOutcome::Updated(updated))
    }

    async fn add_comment(
        &self,
        author: UserId,
        post: PostId,
        text: &str,
    ) -> Result<AddCommentOutcome, Error> {
        let post = self.existing_post(post).await?;
        let Some(text) = CommentText::parse(text) else {
            return Ok(AddCommentOutcome::Discarded);
        };
        let comment = self
            .deps
            .comments
            .create(&NewComment {
                post: post.id(),
                author,
                text,
                created: self.deps.clock.utc(),
            })
            .await?;
        Ok(AddCommentOutcome::Added(comment))
    }
}

#[cfg(test)]
#[path = "post_command_service_tests.rs"]
mod tests;
