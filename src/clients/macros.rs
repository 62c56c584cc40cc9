/// Generate a transport client method: send the request with a oneshot reply channel
/// and hand back the service's result unmodified.
///
/// `$error_type` must provide `closed()` and `dropped()` constructors for the two ways
/// the channel itself can fail.
#[macro_export]
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::closed())?;

                response.await.map_err(|_| <$error_type>::dropped())?
            }
        }
    };
}

/// Generate a controller handle method. Controllers always answer, so the only
/// failure is the controller task being gone.
#[macro_export]
macro_rules! handle_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $crate::error::ControllerError> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| $crate::error::ControllerError::Closed)?;

                response.await.map_err(|_| $crate::error::ControllerError::Dropped)
            }
        }
    };
}
