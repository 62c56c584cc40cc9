use tokio::sync::oneshot;

use crate::controllers::{CreatedListener, FormSnapshot, ListenerId, OrderFormFields, SubmitOutcome};
use crate::domain::{Order, OrderDraft, Product};
use crate::error::TransportError;
use crate::view_state::ViewState;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests served by the order transport service. One request, one HTTP call.
#[derive(Debug)]
pub enum OrderRequest {
    FetchOrders {
        respond_to: ServiceResponse<Vec<Order>, TransportError>,
    },
    CreateOrder {
        draft: OrderDraft,
        respond_to: ServiceResponse<Order, TransportError>,
    },
    Shutdown,
}

/// Requests served by the product transport service.
#[derive(Debug)]
pub enum ProductRequest {
    FetchProducts {
        respond_to: ServiceResponse<Vec<Product>, TransportError>,
    },
    Shutdown,
}

/// Requests served by the order list controller.
#[derive(Debug)]
pub enum ListRequest {
    Activate {
        respond_to: oneshot::Sender<ViewState<Order>>,
    },
    /// `respond_to` is answered once this refresh has been reconciled.
    Refresh {
        respond_to: Option<oneshot::Sender<ViewState<Order>>>,
    },
    Snapshot {
        respond_to: oneshot::Sender<ViewState<Order>>,
    },
    Shutdown,
}

/// Requests served by the order form controller.
pub enum FormRequest {
    Activate {
        respond_to: oneshot::Sender<FormSnapshot>,
    },
    LoadProducts {
        respond_to: oneshot::Sender<FormSnapshot>,
    },
    Submit {
        respond_to: oneshot::Sender<SubmitOutcome>,
    },
    SetProduct {
        product: String,
        respond_to: oneshot::Sender<OrderFormFields>,
    },
    SetQuantity {
        quantity: i64,
        respond_to: oneshot::Sender<OrderFormFields>,
    },
    ResetFields {
        respond_to: oneshot::Sender<OrderFormFields>,
    },
    Snapshot {
        respond_to: oneshot::Sender<FormSnapshot>,
    },
    Subscribe {
        listener: CreatedListener,
        respond_to: oneshot::Sender<ListenerId>,
    },
    Unsubscribe {
        id: ListenerId,
        respond_to: oneshot::Sender<bool>,
    },
    Shutdown,
}

impl std::fmt::Debug for FormRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormRequest::Activate { .. } => "Activate",
            FormRequest::LoadProducts { .. } => "LoadProducts",
            FormRequest::Submit { .. } => "Submit",
            FormRequest::SetProduct { .. } => "SetProduct",
            FormRequest::SetQuantity { .. } => "SetQuantity",
            FormRequest::ResetFields { .. } => "ResetFields",
            FormRequest::Snapshot { .. } => "Snapshot",
            FormRequest::Subscribe { .. } => "Subscribe",
            FormRequest::Unsubscribe { .. } => "Unsubscribe",
            FormRequest::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}
