use crate::core::table;
use crate::domain::model::{SortDirective, Venue, VenueDraft};
use crate::domain::ports::VenueStore;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};

impl Validate for VenueDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("region", &self.region)?;
        validate_non_empty_string("name", &self.name)?;
        if let Some(link) = self.external_link.as_deref().filter(|l| !l.trim().is_empty()) {
            validate_url("external_link", link)?;
        }
        Ok(())
    }
}

impl VenueDraft {
    /// Trims every field and turns a blank link into no link.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.region,
            &mut self.name,
            &mut self.price,
            &mut self.comment,
            &mut self.map,
        ] {
            *field = field.trim().to_string();
        }
        self.external_link = self
            .external_link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }
}

/// Venue list operations on top of a store. Drafts are validated before the
/// store sees them; store failures are logged here and handed back.
pub struct VenueBook<S: VenueStore> {
    store: S,
}

impl<S: VenueStore> VenueBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Venue>> {
        let venues = self.store.list().await.inspect_err(|e| {
            tracing::error!("Error fetching venues: {}", e);
        })?;
        tracing::debug!("🏰 Fetched {} venues", venues.len());
        Ok(venues)
    }

    pub async fn list_sorted(&self, directive: Option<SortDirective>) -> Result<Vec<Venue>> {
        let venues = self.list().await?;
        Ok(table::sorted_rows(&venues, directive).into_iter().cloned().collect())
    }

    pub async fn add(&self, draft: VenueDraft) -> Result<()> {
        let draft = draft.normalized();
        draft.validate()?;
        self.store.insert(&draft).await.inspect_err(|e| {
            tracing::error!("Error saving venue '{}': {}", draft.name, e);
        })?;
        tracing::info!("✅ Added venue '{}'", draft.name);
        Ok(())
    }

    pub async fn edit(&self, id: &str, draft: VenueDraft) -> Result<()> {
        let draft = draft.normalized();
        draft.validate()?;
        self.store.update(id, &draft).await.inspect_err(|e| {
            tracing::error!("Error updating venue {}: {}", id, e);
        })?;
        tracing::info!("✅ Updated venue {}", id);
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.store.delete(id).await.inspect_err(|e| {
            tracing::error!("Error deleting venue {}: {}", id, e);
        })?;
        tracing::info!("🗑️ Deleted venue {}", id);
        Ok(())
    }
}
