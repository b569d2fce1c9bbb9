use anyhow::Result;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::vessel_files::{NewVesselFile, VesselFile};

#[derive(Clone)]
pub struct VesselFilesRepository {
    pool: DbPool,
}

impl VesselFilesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record an uploaded document; `None` when the vessel does not exist.
    pub async fn create(&self, file: NewVesselFile) -> Result<Option<VesselFile>> {
        use crate::schema::vessel_files;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            match diesel::insert_into(vessel_files::table)
                .values(&file)
                .get_result::<VesselFile>(&mut conn)
            {
                Ok(row) => Ok::<Option<VesselFile>, anyhow::Error>(Some(row)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await??;

        Ok(result)
    }

    /// Documents for a vessel, newest upload first.
    pub async fn for_vessel(&self, vessel: i32) -> Result<Vec<VesselFile>> {
        use crate::schema::vessel_files::dsl::*;

        let pool = self.pool.clone();

        let files = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let files: Vec<VesselFile> = vessel_files
                .filter(vessel_id.eq(vessel))
                .order(created_at.desc())
                .select(VesselFile::as_select())
                .load(&mut conn)?;

            Ok::<Vec<VesselFile>, anyhow::Error>(files)
        })
        .await??;

        Ok(files)
    }

    /// Delete a document row and hand back the deleted row so the caller
    /// can remove the stored file from disk. `None` when the document does
    /// not exist under that vessel.
    pub async fn delete(&self, vessel: i32, file_id: i32) -> Result<Option<VesselFile>> {
        use crate::schema::vessel_files::dsl::*;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let file: Option<VesselFile> = vessel_files
                .filter(id.eq(file_id))
                .filter(vessel_id.eq(vessel))
                .select(VesselFile::as_select())
                .first(&mut conn)
                .optional()?;

            let Some(file) = file else {
                return Ok::<Option<VesselFile>, anyhow::Error>(None);
            };

            diesel::delete(vessel_files.filter(id.eq(file_id))).execute(&mut conn)?;

            Ok(Some(file))
        })
        .await??;

        Ok(result)
    }
}
