//! Artifacts passed from the gschema compilers to the runtime.
//!
//! - `types`: per-module type descriptor tables
//! - `operation`: persisted operation registries

pub mod operation;
pub mod types;

pub use operation::{OperationKind, OperationRecord, OperationRegistry};
pub use types::{
    ArgumentDescriptor, CallableRef, DefaultValue, DescriptorSet, DescriptorTable,
    DirectiveInvocation, FieldDescriptor, TypeBody, TypeDescriptor, TypeKind, TypeRef,
};
