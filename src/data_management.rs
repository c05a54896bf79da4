//! Data Management pipeline: hub, project and folder browsing.
//!
//! Each variant carries exactly the fields its request needs, so "this
//! parameter is required only for that operation" holds by construction
//! instead of by runtime validation. Resolution is pure; see
//! [`crate::contract::Operation`].

use crate::config::ApsConfig;
use crate::contract::{ListOptions, Operation};
use crate::error::ApsError;
use crate::request::{path_param, Method, RequestDescriptor};

/// Closed set of Data Management operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DataManagementOperation {
    /// `GET /project/v1/hubs`
    ListHubs { options: ListOptions },
    /// `GET /project/v1/hubs/{hubId}`
    GetHub { hub_id: String },
    /// `GET /project/v1/hubs/{hubId}/projects`
    ListProjects {
        hub_id: String,
        options: ListOptions,
    },
    /// `GET /project/v1/hubs/{hubId}/projects/{projectId}`
    GetProject {
        hub_id: String,
        project_id: String,
    },
    /// `GET /project/v1/hubs/{hubId}/projects/{projectId}/topFolders`
    ListTopFolders {
        hub_id: String,
        project_id: String,
    },
    /// `GET /data/v1/projects/{projectId}/folders/{folderId}`
    GetFolder {
        project_id: String,
        folder_id: String,
    },
    /// `GET /data/v1/projects/{projectId}/folders/{folderId}/contents`
    ListFolderContents {
        project_id: String,
        folder_id: String,
        options: ListOptions,
    },
    /// `GET /data/v1/projects/{projectId}/items/{itemId}/versions`
    ListItemVersions {
        project_id: String,
        item_id: String,
    },
}

impl Operation for DataManagementOperation {
    fn resolve(&self, config: &ApsConfig) -> Result<RequestDescriptor, ApsError> {
        use DataManagementOperation::*;

        let base = &config.base_url;
        let request = match self {
            ListHubs { options } => options.apply(
                RequestDescriptor::new(Method::Get, format!("{base}/project/v1/hubs")),
                config,
            ),
            GetHub { hub_id } => {
                let hub = path_param("hubId", hub_id)?;
                RequestDescriptor::new(Method::Get, format!("{base}/project/v1/hubs/{hub}"))
            }
            ListProjects { hub_id, options } => {
                let hub = path_param("hubId", hub_id)?;
                options.apply(
                    RequestDescriptor::new(
                        Method::Get,
                        format!("{base}/project/v1/hubs/{hub}/projects"),
                    ),
                    config,
                )
            }
            GetProject { hub_id, project_id } => {
                let hub = path_param("hubId", hub_id)?;
                let project = path_param("projectId", project_id)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/project/v1/hubs/{hub}/projects/{project}"),
                )
            }
            ListTopFolders { hub_id, project_id } => {
                let hub = path_param("hubId", hub_id)?;
                let project = path_param("projectId", project_id)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/project/v1/hubs/{hub}/projects/{project}/topFolders"),
                )
            }
            GetFolder {
                project_id,
                folder_id,
            } => {
                let project = path_param("projectId", project_id)?;
                let folder = path_param("folderId", folder_id)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/data/v1/projects/{project}/folders/{folder}"),
                )
            }
            ListFolderContents {
                project_id,
                folder_id,
                options,
            } => {
                let project = path_param("projectId", project_id)?;
                let folder = path_param("folderId", folder_id)?;
                options.apply(
                    RequestDescriptor::new(
                        Method::Get,
                        format!("{base}/data/v1/projects/{project}/folders/{folder}/contents"),
                    ),
                    config,
                )
            }
            ListItemVersions {
                project_id,
                item_id,
            } => {
                let project = path_param("projectId", project_id)?;
                let item = path_param("itemId", item_id)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/data/v1/projects/{project}/items/{item}/versions"),
                )
            }
        };
        Ok(request)
    }
}
