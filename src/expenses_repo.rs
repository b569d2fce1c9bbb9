use anyhow::Result;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::expenses::Expense;

#[derive(Clone)]
pub struct ExpensesRepository {
    pool: DbPool,
}

impl ExpensesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record an expense; `None` when the voyage does not exist.
    pub async fn create(&self, expense: Expense) -> Result<Option<Expense>> {
        use crate::schema::expenses;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            match diesel::insert_into(expenses::table)
                .values(&expense)
                .execute(&mut conn)
            {
                Ok(_) => Ok::<Option<Expense>, anyhow::Error>(Some(expense)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await??;

        Ok(result)
    }

    pub async fn list(&self, voyage: Option<String>) -> Result<Vec<Expense>> {
        use crate::schema::expenses::dsl::*;

        let pool = self.pool.clone();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let mut query = expenses.into_boxed();
            if let Some(voyage) = voyage.filter(|v| !v.is_empty()) {
                query = query.filter(voyage_id.eq(voyage));
            }

            let rows: Vec<Expense> = query
                .order(expense_date.asc())
                .select(Expense::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Expense>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn delete(&self, expense_id: &str) -> Result<bool> {
        use crate::schema::expenses::dsl::*;

        let pool = self.pool.clone();
        let expense_id = expense_id.to_string();

        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(expenses.filter(id.eq(&expense_id))).execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows > 0)
    }
}
