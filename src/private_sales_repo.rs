use anyhow::Result;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::private_sales::PrivateSale;

#[derive(Clone)]
pub struct PrivateSalesRepository {
    pool: DbPool,
}

impl PrivateSalesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a private sale; `None` when the voyage does not exist.
    pub async fn create(&self, sale: PrivateSale) -> Result<Option<PrivateSale>> {
        use crate::schema::private_sales;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            match diesel::insert_into(private_sales::table)
                .values(&sale)
                .execute(&mut conn)
            {
                Ok(_) => Ok::<Option<PrivateSale>, anyhow::Error>(Some(sale)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await??;

        Ok(result)
    }

    pub async fn list(&self, voyage: Option<String>) -> Result<Vec<PrivateSale>> {
        use crate::schema::private_sales::dsl::*;

        let pool = self.pool.clone();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let mut query = private_sales.into_boxed();
            if let Some(voyage) = voyage.filter(|v| !v.is_empty()) {
                query = query.filter(voyage_id.eq(voyage));
            }

            let rows: Vec<PrivateSale> = query
                .order(sale_date.asc())
                .select(PrivateSale::as_select())
                .load(&mut conn)?;

            Ok::<Vec<PrivateSale>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn delete(&self, sale_id: &str) -> Result<bool> {
        use crate::schema::private_sales::dsl::*;

        let pool = self.pool.clone();
        let sale_id = sale_id.to_string();

        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(private_sales.filter(id.eq(&sale_id))).execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows > 0)
    }
}
