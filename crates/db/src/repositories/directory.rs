//! Employee and destination lookups.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use leavedesk_core::ports::{City, DestinationDirectory, Employee, EmployeeDirectory, StoreError};
use leavedesk_shared::types::{CityId, EmployeeId};

use super::error::store_error;
use crate::entities::{cities, employees};

/// Read-only repository over the `employees` and `cities` tables.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    db: DatabaseConnection,
}

impl DirectoryRepository {
    /// Creates a new directory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts or refreshes an employee record synchronised from the HR system.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        let now = Utc::now().into();
        let row = employees::ActiveModel {
            id: Set(employee.id.into_inner()),
            supervisor_id: Set(employee.supervisor_id.map(EmployeeId::into_inner)),
            full_name: Set(employee.full_name.clone()),
            email: Set(employee.email.clone()),
            active: Set(employee.active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        employees::Entity::insert(row)
            .on_conflict(
                OnConflict::column(employees::Column::Id)
                    .update_columns([
                        employees::Column::SupervisorId,
                        employees::Column::FullName,
                        employees::Column::Email,
                        employees::Column::Active,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    /// Inserts or refreshes a destination city.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert_city(&self, city: &City) -> Result<(), StoreError> {
        let row = cities::ActiveModel {
            id: Set(city.id.into_inner()),
            name: Set(city.name.clone()),
            province: Set(city.province.clone()),
            active: Set(city.active),
            created_at: Set(Utc::now().into()),
        };

        cities::Entity::insert(row)
            .on_conflict(
                OnConflict::column(cities::Column::Id)
                    .update_columns([
                        cities::Column::Name,
                        cities::Column::Province,
                        cities::Column::Active,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

fn employee_from_model(model: employees::Model) -> Employee {
    Employee {
        id: EmployeeId::from_uuid(model.id),
        supervisor_id: model.supervisor_id.map(EmployeeId::from_uuid),
        full_name: model.full_name,
        email: model.email,
        active: model.active,
    }
}

fn city_from_model(model: cities::Model) -> City {
    City {
        id: CityId::from_uuid(model.id),
        name: model.name,
        province: model.province,
        active: model.active,
    }
}

#[async_trait]
impl EmployeeDirectory for DirectoryRepository {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let model = employees::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(employee_from_model))
    }

    async fn subordinates_of(
        &self,
        supervisor_id: EmployeeId,
    ) -> Result<Vec<Employee>, StoreError> {
        let models = employees::Entity::find()
            .filter(employees::Column::SupervisorId.eq(supervisor_id.into_inner()))
            .order_by_asc(employees::Column::FullName)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(models.into_iter().map(employee_from_model).collect())
    }
}

#[async_trait]
impl DestinationDirectory for DirectoryRepository {
    async fn find_city(&self, id: CityId) -> Result<Option<City>, StoreError> {
        let model = cities::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(city_from_model))
    }
}
