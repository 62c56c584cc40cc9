use crate::domain::OrderDraft;
use crate::error::{Field, ValidationError, ValidationErrors};

pub const DEFAULT_QUANTITY: i64 = 1;
pub const MIN_QUANTITY: i64 = 1;

/// The editable fields of the order form, exactly as the user entered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFormFields {
    pub product: String,
    pub quantity: i64,
}

impl Default for OrderFormFields {
    fn default() -> Self {
        Self {
            product: String::new(),
            quantity: DEFAULT_QUANTITY,
        }
    }
}

impl OrderFormFields {
    pub fn new(product: impl Into<String>, quantity: i64) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}

/// Checks the fields and builds the draft to submit. Runs before any network call.
pub fn validate(fields: &OrderFormFields) -> Result<OrderDraft, ValidationErrors> {
    let mut errors = Vec::new();

    if fields.product.is_empty() {
        errors.push(ValidationError::Required(Field::Product));
    }

    let quantity = if fields.quantity < MIN_QUANTITY {
        errors.push(ValidationError::BelowMinimum {
            field: Field::Quantity,
            min: MIN_QUANTITY,
            actual: fields.quantity,
        });
        None
    } else {
        match i32::try_from(fields.quantity) {
            Ok(quantity) => Some(quantity),
            Err(_) => {
                errors.push(ValidationError::TooLarge {
                    field: Field::Quantity,
                    actual: fields.quantity,
                });
                None
            }
        }
    };

    match quantity {
        Some(quantity) if errors.is_empty() => Ok(OrderDraft::new(fields.product.clone(), quantity)),
        _ => Err(ValidationErrors(errors)),
    }
}
