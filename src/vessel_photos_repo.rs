use anyhow::Result;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::vessel_photos::{NewVesselPhoto, VesselPhoto};

#[derive(Clone)]
pub struct VesselPhotosRepository {
    pool: DbPool,
}

impl VesselPhotosRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record an uploaded photo; `None` when the vessel does not exist.
    pub async fn create(&self, photo: NewVesselPhoto) -> Result<Option<VesselPhoto>> {
        use crate::schema::vessel_photos;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            match diesel::insert_into(vessel_photos::table)
                .values(&photo)
                .get_result::<VesselPhoto>(&mut conn)
            {
                Ok(row) => Ok::<Option<VesselPhoto>, anyhow::Error>(Some(row)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await??;

        Ok(result)
    }

    /// Photos for a vessel, primary first, then newest upload first.
    pub async fn for_vessel(&self, vessel: i32) -> Result<Vec<VesselPhoto>> {
        use crate::schema::vessel_photos::dsl::*;

        let pool = self.pool.clone();

        let photos = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let photos: Vec<VesselPhoto> = vessel_photos
                .filter(vessel_id.eq(vessel))
                .order((is_primary.desc(), created_at.desc()))
                .select(VesselPhoto::as_select())
                .load(&mut conn)?;

            Ok::<Vec<VesselPhoto>, anyhow::Error>(photos)
        })
        .await??;

        Ok(photos)
    }

    /// Make one photo the vessel's primary, demoting any sibling that
    /// currently holds the flag. Both writes happen in one transaction so
    /// the vessel never shows two primaries.
    pub async fn set_primary(&self, vessel: i32, photo_id: i32) -> Result<Option<VesselPhoto>> {
        use crate::schema::vessel_photos::dsl::*;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let promoted = conn.transaction::<Option<VesselPhoto>, DieselError, _>(|conn| {
                let rows = diesel::update(
                    vessel_photos
                        .filter(id.eq(photo_id))
                        .filter(vessel_id.eq(vessel)),
                )
                .set(is_primary.eq(true))
                .execute(conn)?;

                if rows == 0 {
                    return Ok(None);
                }

                diesel::update(
                    vessel_photos
                        .filter(vessel_id.eq(vessel))
                        .filter(id.ne(photo_id)),
                )
                .set(is_primary.eq(false))
                .execute(conn)?;

                let photo = vessel_photos
                    .filter(id.eq(photo_id))
                    .select(VesselPhoto::as_select())
                    .first(conn)?;

                Ok(Some(photo))
            })?;

            Ok::<Option<VesselPhoto>, anyhow::Error>(promoted)
        })
        .await??;

        Ok(result)
    }

    /// Delete a photo row and hand back the deleted row so the caller can
    /// remove the stored file from disk. `None` when the photo does not
    /// exist under that vessel.
    pub async fn delete(&self, vessel: i32, photo_id: i32) -> Result<Option<VesselPhoto>> {
        use crate::schema::vessel_photos::dsl::*;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let photo: Option<VesselPhoto> = vessel_photos
                .filter(id.eq(photo_id))
                .filter(vessel_id.eq(vessel))
                .select(VesselPhoto::as_select())
                .first(&mut conn)
                .optional()?;

            let Some(photo) = photo else {
                return Ok::<Option<VesselPhoto>, anyhow::Error>(None);
            };

            diesel::delete(vessel_photos.filter(id.eq(photo_id))).execute(&mut conn)?;

            Ok(Some(photo))
        })
        .await??;

        Ok(result)
    }
}
