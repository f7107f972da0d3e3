//! Customer repository.

use domain::{Customer, CustomerId, Email};
use table_store::{Cursor, FilterCond, Query, Scan, TableIndex, TableStore};

use crate::error::{RepositoryError, Result};
use crate::mapping::{self, ATTR_TYPE, EntityType, customer_key, email_partition};
use crate::pages::{Paged, decode_page};

/// Persistence operations for customers.
///
/// `save` enforces email uniqueness with a check-then-put against GSI1.
/// The check and the put are not atomic (a GSI projection cannot be
/// guarded by a primary-key conditional write), so two concurrent saves
/// of the same email can both pass the pre-check. Sequential duplicates
/// are always rejected.
pub struct CustomerRepository<S> {
    store: S,
}

impl<S: TableStore> CustomerRepository<S> {
    /// Creates a repository over the given store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates or updates a customer after the email uniqueness pre-check.
    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id()))]
    pub async fn save(&self, customer: &Customer) -> Result<()> {
        if let Some(existing) = self.lookup_by_email(customer.email()).await?
            && existing.id() != customer.id()
        {
            return Err(RepositoryError::DuplicateEmail(
                customer.email().to_string(),
            ));
        }
        self.store.put(mapping::customer::to_item(customer)).await?;
        tracing::debug!("customer saved");
        Ok(())
    }

    /// Point-reads a customer by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &CustomerId) -> Result<Customer> {
        let key = customer_key(id);
        match self.store.get(&key).await? {
            Some(item) => {
                mapping::customer::from_item(&item).map_err(|source| {
                    RepositoryError::CorruptRecord {
                        entity: "customer",
                        key: key.pk.clone(),
                        source,
                    }
                })
            }
            None => Err(RepositoryError::NotFound {
                entity: "customer",
                id: id.to_string(),
            }),
        }
    }

    /// Looks a customer up by normalized email via GSI1.
    #[tracing::instrument(skip(self, email), fields(email = %email))]
    pub async fn find_by_email(&self, email: &Email) -> Result<Customer> {
        self.lookup_by_email(email)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "customer",
                id: email.to_string(),
            })
    }

    /// Lists customers via a filtered scan. Customers have no list-all
    /// partition; the email GSI keys each one separately.
    #[tracing::instrument(skip(self, cursor))]
    pub async fn find_all(&self, limit: u32, cursor: Option<Cursor>) -> Result<Paged<Customer>> {
        let page = self
            .store
            .scan(
                Scan::filtered(vec![FilterCond::Equals(
                    ATTR_TYPE,
                    EntityType::Customer.as_str().into(),
                )])
                .limit(limit)
                .cursor(cursor),
            )
            .await?;
        Ok(decode_page("customer", page, mapping::customer::from_item))
    }

    /// Deletes a customer, failing when absent.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &CustomerId) -> Result<()> {
        if !self.store.delete(&customer_key(id)).await? {
            return Err(RepositoryError::NotFound {
                entity: "customer",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Returns true if a customer exists under the id.
    pub async fn exists(&self, id: &CustomerId) -> Result<bool> {
        match self.find_by_id(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn lookup_by_email(&self, email: &Email) -> Result<Option<Customer>> {
        let page = self
            .store
            .query(Query::partition(TableIndex::Gsi1, email_partition(email)).limit(1))
            .await?;
        match page.items.first() {
            Some(item) => {
                let customer = mapping::customer::from_item(item).map_err(|source| {
                    RepositoryError::CorruptRecord {
                        entity: "customer",
                        key: email_partition(email),
                        source,
                    }
                })?;
                Ok(Some(customer))
            }
            None => Ok(None),
        }
    }
}
