//! Notification payloads.
//!
//! A [`Payload`] is the ordered argument list passed to `notify`. Arguments
//! are type-erased and read back by position with [`Payload::get`].
//!
//! [`IntoPayload`] is implemented for `()`, [`Payload`] and tuples of up to
//! twelve elements, so call sites read naturally:
//!
//! ```
//! use wirebox_system::payload::IntoPayload;
//!
//! let payload = (42_u32, "alice").into_payload();
//! assert_eq!(payload.get::<u32>(0), Some(&42));
//! assert_eq!(payload.get::<&str>(1), Some(&"alice"));
//! assert!(payload.get::<String>(1).is_none());
//! ```

use core::any::Any;
use core::fmt;

use variadics_please::all_tuples;

/// Ordered, type-erased notification arguments.
#[derive(Default)]
pub struct Payload {
    args: Vec<Box<dyn Any + Send + Sync>>,
}

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Appends an argument, builder style.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, arg: T) -> Self {
        self.push(arg);
        self
    }

    /// Appends an argument.
    pub fn push<T: Any + Send + Sync>(&mut self, arg: T) {
        self.args.push(Box::new(arg));
    }

    /// Returns the argument at `index` if it exists and is a `T`.
    #[must_use]
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.args.get(index).and_then(|arg| arg.downcast_ref::<T>())
    }

    /// Returns the first argument if it is a `T`.
    #[must_use]
    pub fn first<T: Any>(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload").field("len", &self.len()).finish()
    }
}

/// Conversion into a [`Payload`].
pub trait IntoPayload {
    /// Performs the conversion.
    fn into_payload(self) -> Payload;
}

impl IntoPayload for Payload {
    fn into_payload(self) -> Payload {
        self
    }
}

impl IntoPayload for () {
    fn into_payload(self) -> Payload {
        Payload::new()
    }
}

macro_rules! impl_into_payload_for_tuple {
    ($($P:ident),*) => {
        impl<$($P: Any + Send + Sync),*> IntoPayload for ($($P,)*) {
            #[expect(non_snake_case, reason = "tuple fields are bound to their type parameter names")]
            fn into_payload(self) -> Payload {
                let ($($P,)*) = self;
                Payload::new()$(.with($P))*
            }
        }
    };
}

all_tuples!(impl_into_payload_for_tuple, 1, 12, P);
