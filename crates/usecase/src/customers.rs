//! Customer CRUD service.

use domain::{Customer, CustomerId, Email};
use repository::{CustomerRepository, Paged};
use table_store::{Cursor, TableStore};

use crate::error::Result;

/// Fields of a customer update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Customer lifecycle operations.
pub struct CustomerService<S> {
    repo: CustomerRepository<S>,
}

impl<S: TableStore> CustomerService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: CustomerRepository::new(store),
        }
    }

    /// Registers a customer under a system-generated id.
    #[tracing::instrument(skip(self, email, name))]
    pub async fn create(&self, email: &str, name: &str) -> Result<Customer> {
        let customer = Customer::new(CustomerId::generate(), Email::new(email)?, name);
        self.repo.save(&customer).await?;
        tracing::info!(customer_id = %customer.id(), "customer created");
        Ok(customer)
    }

    pub async fn get(&self, id: &CustomerId) -> Result<Customer> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn get_by_email(&self, email: &Email) -> Result<Customer> {
        Ok(self.repo.find_by_email(email).await?)
    }

    /// Lists registered customers, paginated.
    pub async fn list(&self, limit: u32, cursor: Option<Cursor>) -> Result<Paged<Customer>> {
        Ok(self.repo.find_all(limit, cursor).await?)
    }

    /// Applies a partial update and persists the result.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: &CustomerId, update: UpdateCustomer) -> Result<Customer> {
        let mut customer = self.repo.find_by_id(id).await?;
        if let Some(email) = update.email {
            customer.update_email(Email::new(email)?);
        }
        if let Some(name) = update.name {
            customer.update_name(name);
        }
        self.repo.save(&customer).await?;
        Ok(customer)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &CustomerId) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::info!("customer deleted");
        Ok(())
    }
}
