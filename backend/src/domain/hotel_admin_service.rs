//! Admin-only hotel management.

use std::sync::Arc;

use tracing::info;

use super::field::field_error;
use super::ports::HotelRepository;
use super::{
    Error, Hotel, HotelChain, HotelDeletion, HotelDraft, HotelId, HotelSort, StaffPrincipal,
};

const ADMIN_ONLY: &str = "Only admins can manage hotels.";

/// Lists, creates, edits and deletes hotels.
#[derive(Clone)]
pub struct HotelAdminService {
    hotels: Arc<dyn HotelRepository>,
}

impl HotelAdminService {
    /// Create the service.
    pub fn new(hotels: Arc<dyn HotelRepository>) -> Self {
        Self { hotels }
    }

    /// Every hotel in the requested order.
    pub async fn list(&self, staff: &StaffPrincipal, sort: HotelSort) -> Result<Vec<Hotel>, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        Ok(self.hotels.list(sort).await?)
    }

    /// Chains offered by the hotel form.
    pub async fn chains(&self, staff: &StaffPrincipal) -> Result<Vec<HotelChain>, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        Ok(self.hotels.list_chains().await?)
    }

    /// One hotel, for the edit form.
    pub async fn get(&self, staff: &StaffPrincipal, id: HotelId) -> Result<Hotel, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        self.hotels
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Hotel not found."))
    }

    async fn ensure_chain(&self, draft: &HotelDraft) -> Result<(), Error> {
        if self.hotels.chain_exists(draft.chain_id()).await? {
            Ok(())
        } else {
            Err(field_error(
                "hotel_chain_id",
                "unknown_chain",
                "Hotel chain not found.",
            ))
        }
    }

    /// Add a hotel to an existing chain.
    pub async fn create(&self, staff: &StaffPrincipal, draft: &HotelDraft) -> Result<Hotel, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        self.ensure_chain(draft).await?;
        let hotel = self.hotels.insert(draft).await?;
        info!(hotel_id = %hotel.id, "hotel added");
        Ok(hotel)
    }

    /// Overwrite a hotel.
    pub async fn update(
        &self,
        staff: &StaffPrincipal,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Hotel, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        self.ensure_chain(draft).await?;
        self.hotels
            .update(id, draft)
            .await?
            .ok_or_else(|| Error::not_found("Hotel not found."))
    }

    /// Delete a hotel that no booking references.
    pub async fn delete(&self, staff: &StaffPrincipal, id: HotelId) -> Result<(), Error> {
        staff.require_admin(ADMIN_ONLY)?;
        match self.hotels.delete_if_unbooked(id).await? {
            HotelDeletion::Deleted => {
                info!(hotel_id = %id, "hotel deleted");
                Ok(())
            }
            HotelDeletion::HasBookings => Err(Error::conflict(
                "Cannot delete the hotel because it has existing bookings.",
            )),
            HotelDeletion::NotFound => Err(Error::not_found("Hotel not found.")),
        }
    }
}
