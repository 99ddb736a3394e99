//! Rentals repository

use std::sync::Arc;

use super::{clear_slot, put_record, scan_slot};
use crate::{
    error::{AppError, AppResult},
    models::rental::RentalRecord,
    store::{Precondition, RecordStore, Slot},
};

#[derive(Clone)]
pub struct RentalsRepository {
    store: Arc<dyn RecordStore>,
}

impl RentalsRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All rentals in booking order
    pub async fn list(&self) -> AppResult<Vec<RentalRecord>> {
        let rows = scan_slot::<RentalRecord>(self.store.as_ref(), Slot::Rentals).await?;
        Ok(rows.into_iter().map(|v| v.record).collect())
    }

    /// Rentals booked by one renter
    pub async fn list_for_renter(&self, renter_id: &str) -> AppResult<Vec<RentalRecord>> {
        let mut rentals = self.list().await?;
        rentals.retain(|r| r.renter_id == renter_id);
        Ok(rentals)
    }

    /// Store a new rental. The identifier must not be in use.
    pub async fn create(&self, rental: &RentalRecord) -> AppResult<()> {
        put_record(
            self.store.as_ref(),
            Slot::Rentals,
            rental.id,
            rental,
            Precondition::Absent,
        )
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Rental identifier {} is already in use", rental.id))
            }
            other => other,
        })?;
        Ok(())
    }

    /// Replace the whole collection, keeping the given order
    pub async fn replace_all(&self, rentals: &[RentalRecord]) -> AppResult<()> {
        clear_slot(self.store.as_ref(), Slot::Rentals).await?;
        for rental in rentals {
            put_record(self.store.as_ref(), Slot::Rentals, rental.id, rental, Precondition::Any).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::rental::RentalStatus, store::MemoryStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn rental(id: i64, renter: &str) -> RentalRecord {
        RentalRecord {
            id,
            equipment_id: 1,
            equipment_name: "Tractor".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            total_days: 2,
            total_cost: Decimal::from(200),
            insurance_accepted: false,
            renter_id: renter.to_string(),
            status: RentalStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_list_for_renter() {
        let repo = RentalsRepository::new(Arc::new(MemoryStore::new()));
        repo.create(&rental(1, "a")).await.unwrap();
        repo.create(&rental(2, "b")).await.unwrap();
        repo.create(&rental(3, "a")).await.unwrap();

        let ids: Vec<i64> = repo.list_for_renter("a").await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rental_identifier_collision() {
        let repo = RentalsRepository::new(Arc::new(MemoryStore::new()));
        repo.create(&rental(1, "a")).await.unwrap();
        assert!(matches!(repo.create(&rental(1, "b")).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_corrupt_rental_is_storage_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("rentals/1", "{\"id\": ".to_string(), Precondition::Any)
            .await
            .unwrap();

        let repo = RentalsRepository::new(store);
        assert!(matches!(repo.list().await, Err(AppError::Storage(_))));
    }
}
