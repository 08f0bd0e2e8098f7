//! Server info resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceKind;

/// Server identity and store settings (dynamic).
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "instructions://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Name, version and record store settings of this MCP server";
    const KIND: ResourceKind = ResourceKind::ServerInfo;
}
