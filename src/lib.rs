#![doc = "aps-client: typed request pipelines for the Autodesk Platform Services REST APIs."]

//! Two independent operation families share one execution model: a typed
//! operation resolves to a fully-specified request descriptor, a transport
//! collaborator performs the authenticated call, and the response normaliser
//! reduces whatever comes back (JSON:API lists and singletons, ad hoc domain
//! payloads, binary streams) to a uniform stream of output items that stay
//! traceable to the inputs that produced them.
//!
//! # Usage
//! Build an [`config::ApsConfig`], describe each input item as an
//! [`contract::ItemPlan`] over [`data_management::DataManagementOperation`]
//! or [`forge::ForgeOperation`], and run [`pipeline::execute`] with a
//! [`contract::Transport`] implementation such as [`http::HttpTransport`].

pub mod config;
pub mod contract;
pub mod data_management;
pub mod error;
pub mod forge;
pub mod http;
pub mod normalize;
pub mod pipeline;
pub mod request;
