//! View-state controllers. Each one is a service task that owns its view state and
//! is driven through a cloneable client handle.

pub mod order_form;
pub mod order_list;
pub mod validation;

pub use order_form::{
    CreatedListener, FormSnapshot, ListenerId, OrderFormClient, OrderFormService, SubmitOutcome,
    LOAD_PRODUCTS_FAILED, ORDER_CREATION_FAILED,
};
pub use order_list::{OrderListClient, OrderListService, LOAD_ORDERS_FAILED};
pub use validation::{validate, OrderFormFields};
