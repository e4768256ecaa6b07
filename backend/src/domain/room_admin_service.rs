//! Room management for Admins and Managers.

use std::sync::Arc;

use tracing::info;

use super::ports::RoomRepository;
use super::{Error, Room, RoomDraft, RoomId, RoomSort, StaffPrincipal};

/// Lists, creates, edits and deletes rooms within the actor's hotel scope.
#[derive(Clone)]
pub struct RoomAdminService {
    rooms: Arc<dyn RoomRepository>,
}

impl RoomAdminService {
    /// Create the service.
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// Rooms visible to the actor.
    pub async fn list(&self, staff: &StaffPrincipal, sort: RoomSort) -> Result<Vec<Room>, Error> {
        staff.require_management()?;
        Ok(self.rooms.list(staff.scope(), sort).await?)
    }

    async fn existing(&self, staff: &StaffPrincipal, id: RoomId) -> Result<Room, Error> {
        staff.require_management()?;
        let room = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Room not found."))?;
        staff.ensure_hotel(room.hotel_id, "You can only edit rooms from your own hotel.")?;
        Ok(room)
    }

    /// One room, for the edit form.
    pub async fn get(&self, staff: &StaffPrincipal, id: RoomId) -> Result<Room, Error> {
        self.existing(staff, id).await
    }

    /// Add a room to a hotel in scope.
    pub async fn create(&self, staff: &StaffPrincipal, draft: &RoomDraft) -> Result<Room, Error> {
        staff.require_management()?;
        staff.ensure_hotel(draft.hotel_id(), "You can only add rooms to your own hotel.")?;
        let room = self.rooms.insert(draft).await?;
        info!(room_id = %room.id, hotel_id = %room.hotel_id, "room added");
        Ok(room)
    }

    /// Overwrite a room; Managers may not move it to another hotel.
    pub async fn update(
        &self,
        staff: &StaffPrincipal,
        id: RoomId,
        draft: &RoomDraft,
    ) -> Result<Room, Error> {
        let current = self.existing(staff, id).await?;
        if !staff.is_admin() && draft.hotel_id() != current.hotel_id {
            return Err(Error::forbidden(
                "You cannot reassign a room to another hotel.",
            ));
        }
        self.rooms
            .update(id, draft)
            .await?
            .ok_or_else(|| Error::not_found("Room not found."))
    }

    /// Delete a room in scope.
    pub async fn delete(&self, staff: &StaffPrincipal, id: RoomId) -> Result<(), Error> {
        staff.require_management()?;
        let room = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Room not found."))?;
        staff.ensure_hotel(room.hotel_id, "You can only delete rooms from your own hotel.")?;
        if !self.rooms.delete(id).await? {
            return Err(Error::not_found("Room not found."));
        }
        info!(room_id = %id, employee_id = %staff.id, "room deleted");
        Ok(())
    }
}
