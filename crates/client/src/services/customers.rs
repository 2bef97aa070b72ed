use common::{CustomerId, Envelope, Paginated};
use domain::{Address, Customer, CustomerPatch, NewAddress, NewCustomer};

use crate::executor::RequestExecutor;
use crate::query::QueryParams;

/// Customer and address endpoints.
#[derive(Clone)]
pub struct CustomerService {
    executor: RequestExecutor,
}

impl CustomerService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    pub async fn list(&self, params: Option<&QueryParams>) -> Envelope<Paginated<Customer>> {
        self.executor.get("customers", params).await
    }

    pub async fn get(&self, id: CustomerId) -> Envelope<Customer> {
        self.executor.get(&format!("customers/{id}"), None).await
    }

    pub async fn create(&self, customer: &NewCustomer) -> Envelope<Customer> {
        self.executor.post("customers", Some(customer), None).await
    }

    pub async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Envelope<Customer> {
        self.executor
            .patch(&format!("customers/{id}"), Some(patch), None)
            .await
    }

    /// Fails with `CONFLICT` while the customer has orders.
    pub async fn delete(&self, id: CustomerId) -> Envelope<()> {
        self.executor.delete(&format!("customers/{id}"), None).await
    }

    /// Matches names and email.
    pub async fn search(
        &self,
        term: &str,
        params: Option<&QueryParams>,
    ) -> Envelope<Paginated<Customer>> {
        let params = super::search_params(term, params);
        self.executor.get("customers/search", Some(&params)).await
    }

    pub async fn addresses(&self, id: CustomerId) -> Envelope<Vec<Address>> {
        self.executor
            .get(&format!("customers/{id}/addresses"), None)
            .await
    }

    pub async fn add_address(&self, id: CustomerId, address: &NewAddress) -> Envelope<Address> {
        self.executor
            .post(&format!("customers/{id}/addresses"), Some(address), None)
            .await
    }
}
