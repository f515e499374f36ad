//! Document and recorded-action models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FastcoResult;
use crate::models::base::{Entity, EntityMeta};
use crate::registry::EntityKind;
use crate::validation;

/// A stored document blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    /// Free-form document type (e.g. `articles_of_incorporation`).
    #[serde(rename = "type")]
    pub doc_type: String,
    pub content: String,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        doc_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: name.into(),
            doc_type: doc_type.into(),
            content: content.into(),
        }
    }
}

impl Entity for Document {
    const ROOT: EntityKind = EntityKind::Document;

    fn kind(&self) -> EntityKind {
        EntityKind::Document
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        validation::require_text(EntityKind::Document, "name", &self.name)?;
        validation::require_text(EntityKind::Document, "type", &self.doc_type)
    }
}

/// A recorded activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub variant: ActionVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum ActionVariant {
    #[serde(rename = "Action")]
    Generic,
    DocumentSubmission(DocumentSubmission),
}

/// A document handed in by a legal entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSubmission {
    pub document_id: Uuid,
    pub submitted_by_id: Uuid,
}

impl Action {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: name.into(),
            description: description.into(),
            variant: ActionVariant::Generic,
        }
    }

    pub fn document_submission(document_id: Uuid, submitted_by_id: Uuid) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: "document_submission".into(),
            description: format!("Document {document_id} submitted by {submitted_by_id}"),
            variant: ActionVariant::DocumentSubmission(DocumentSubmission {
                document_id,
                submitted_by_id,
            }),
        }
    }

    pub fn as_submission(&self) -> Option<&DocumentSubmission> {
        match &self.variant {
            ActionVariant::DocumentSubmission(submission) => Some(submission),
            ActionVariant::Generic => None,
        }
    }
}

impl Entity for Action {
    const ROOT: EntityKind = EntityKind::Action;

    fn kind(&self) -> EntityKind {
        match self.variant {
            ActionVariant::Generic => EntityKind::Action,
            ActionVariant::DocumentSubmission(_) => EntityKind::DocumentSubmission,
        }
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        validation::require_text(self.kind(), "name", &self.name)
    }
}
