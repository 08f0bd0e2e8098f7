//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AddInstructionTool, DeleteInstructionTool, GetInstructionsTool, UpdateInstructionTool,
};
use crate::domains::instructions::InstructionRepository;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(repository: Arc<InstructionRepository>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetInstructionsTool::create_route(repository.clone()))
        .with_route(AddInstructionTool::create_route(repository.clone()))
        .with_route(UpdateInstructionTool::create_route(repository.clone()))
        .with_route(DeleteInstructionTool::create_route(repository))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::store::MemoryStore;

    struct TestServer {}

    fn test_repository() -> Arc<InstructionRepository> {
        Arc::new(InstructionRepository::new(Arc::new(MemoryStore::default())))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_repository());
        let tools = router.list_all();
        assert_eq!(tools.len(), 4);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"get_instructions"));
        assert!(names.contains(&"add_instruction"));
        assert!(names.contains(&"update_instruction"));
        assert!(names.contains(&"delete_instruction"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let repository = test_repository();
        let registry = ToolRegistry::new(repository.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(repository);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
