//! Rename workflow: copy an object to a new pathname, then delete the original.
//!
//! The provider has no rename primitive, so a rename is three independent
//! calls. None of them is undone when a later one fails:
//! - fetch fails: nothing was mutated.
//! - store fails: nothing was mutated.
//! - delete fails: the copy at the new pathname and the original both remain.
//!
//! Renaming an object onto its own pathname only checks that it exists and
//! never stores or deletes.

use gallery_core::{Pathname, StoredObject};

use crate::backend::{BlobStore, PutOptions};
use crate::{RenameError, RenameStep, StoreError};

/// Move the object at `source` to `target` and return the new object's metadata.
///
/// The original bytes are downloaded from the object's public URL and
/// re-uploaded with the content type the download reported. When `target`
/// equals `source` the object is left alone and its metadata is returned.
///
/// # Errors
/// Returns [`RenameError`] naming the step that failed. A
/// [`RenameStep::Delete`] failure leaves a duplicate at `target`.
pub async fn rename_object(
    store: &dyn BlobStore,
    source: &Pathname,
    target: &Pathname,
) -> Result<StoredObject, RenameError> {
    let fail = |step: RenameStep, error: StoreError| RenameError {
        step,
        source_path: source.clone(),
        target: target.clone(),
        error,
    };

    let url = store.public_url(source);
    tracing::debug!(source = %source, target = %target, %url, "starting rename");

    let fetched = store
        .fetch(&url)
        .await
        .map_err(|e| fail(RenameStep::Fetch, e))?;

    if source == target {
        tracing::info!(source = %source, "rename target equals source; nothing to do");
        let mut object = StoredObject::new(source.as_str(), url);
        object.size = u64::try_from(fetched.body.len()).ok();
        object.content_type = fetched.content_type;
        return Ok(object);
    }

    let options = PutOptions { content_type: fetched.content_type };
    let object = store
        .put(target, fetched.body, &options)
        .await
        .map_err(|e| fail(RenameStep::Store, e))?;

    if let Err(e) = store.delete(source).await {
        tracing::warn!(
            source = %source,
            target = %target,
            error = %e,
            "original not deleted after copy; both objects now exist"
        );
        return Err(fail(RenameStep::Delete, e));
    }

    tracing::info!(source = %source, target = %target, "object renamed");
    Ok(object)
}
