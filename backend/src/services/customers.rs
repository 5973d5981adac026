//! Customer address book

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use shared::validation::validate_phone;
use shared::Customer;

use crate::debounce::{DebouncedWriter, SavePayload};
use crate::error::{AppError, AppResult};
use crate::state::SessionState;

/// Input for adding or editing a customer
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct CustomerService {
    state: Arc<SessionState>,
    writer: DebouncedWriter,
}

impl CustomerService {
    pub fn new(state: Arc<SessionState>, writer: DebouncedWriter) -> Self {
        Self { state, writer }
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        Ok(self.state.customers.read().await.clone())
    }

    pub async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("name", "Customer name cannot be empty"));
        }
        validate_phone(&input.phone).map_err(|e| AppError::validation("phone", e))?;

        let customer = Customer {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            address: input.address,
            notes: input.notes,
            created_at: Utc::now(),
        };

        let mut customers = self.state.customers.write().await;
        customers.push(customer.clone());
        self.writer
            .schedule(SavePayload::Customers(customers.clone()));
        Ok(customer)
    }

    pub async fn update(&self, id: Uuid, input: CustomerInput) -> AppResult<Customer> {
        validate_phone(&input.phone).map_err(|e| AppError::validation("phone", e))?;

        let mut customers = self.state.customers.write().await;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {id}")))?;

        customer.name = input.name;
        customer.phone = input.phone;
        customer.address = input.address;
        customer.notes = input.notes;

        let updated = customer.clone();
        self.writer
            .schedule(SavePayload::Customers(customers.clone()));
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut customers = self.state.customers.write().await;
        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            return Err(AppError::NotFound(format!("Customer {id}")));
        }

        self.writer
            .schedule(SavePayload::Customers(customers.clone()));
        Ok(())
    }
}
