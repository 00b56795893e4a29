//! MCP service implementation using rmcp.
//!
//! This module defines the LeaveTrackerService struct with the leave tracker
//! tools and the greeting resource exposed via the MCP protocol using the
//! rmcp framework's macros.

use crate::db::LeaveStore;
use crate::error::{TrackerError, TrackerResult};
use crate::models::Outcome;
use crate::tools::greeting::{GREETING_URI_TEMPLATE, greet, greeting_name};
use crate::tools::leave::{
    LeaveHistoryInput, LeaveToolHandler, SubmitLeaveInput, UpdateStatusInput,
};
use crate::tools::students::{ListStudentsInput, StudentToolHandler};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, Implementation, ListResourceTemplatesResult, PaginatedRequestParam,
        ProtocolVersion, RawResourceTemplate, ReadResourceRequestParam, ReadResourceResult,
        ResourceContents, ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct LeaveTrackerService {
    /// Shared statement runner over the process-wide pool
    store: Arc<LeaveStore>,
    /// Upper bound applied to list_students page sizes
    max_list_limit: u32,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl LeaveTrackerService {
    /// Create a new LeaveTrackerService instance.
    ///
    /// # Arguments
    ///
    /// * `store` - Shared store used by every tool call
    /// * `max_list_limit` - Largest page size `list_students` will request
    pub fn new(store: Arc<LeaveStore>, max_list_limit: u32) -> Self {
        Self {
            store,
            max_list_limit,
            tool_router: Self::tool_router(),
        }
    }

    /// Personalized greeting; never touches the datastore.
    pub fn greet(&self, name: &str) -> String {
        greet(name)
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.store.close().await;
    }

    /// Resource templates advertised by this server.
    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        vec![
            RawResourceTemplate {
                uri_template: GREETING_URI_TEMPLATE.to_string(),
                name: "greeting".to_string(),
                title: None,
                description: Some("Personalized greeting for the named user".to_string()),
                mime_type: Some("text/plain".to_string()),
            }
            .no_annotation(),
        ]
    }

    /// Resolve a resource URI to its text contents.
    pub fn read_greeting(&self, uri: &str) -> TrackerResult<ReadResourceResult> {
        let name = greeting_name(uri).ok_or_else(|| TrackerError::resource_not_found(uri))?;
        debug!(uri = %uri, "Reading greeting resource");
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(self.greet(name), uri)],
        })
    }
}

#[tool_router]
impl LeaveTrackerService {
    #[tool(
        description = "Submit a leave request for a student on a date (YYYY-MM-DD).\nNew requests start as 'pending'. Only one request per student and date is allowed; a second one reports already_exists."
    )]
    async fn submit_leave(&self, Parameters(input): Parameters<SubmitLeaveInput>) -> Json<Outcome> {
        let handler = LeaveToolHandler::new(self.store.clone());
        Json(handler.submit_leave(input).await)
    }

    #[tool(
        description = "Set the status of an existing leave request.\nnew_status must be exactly one of: pending, approved, rejected. Any status can be overwritten by any other."
    )]
    async fn update_status(
        &self,
        Parameters(input): Parameters<UpdateStatusInput>,
    ) -> Json<Outcome> {
        let handler = LeaveToolHandler::new(self.store.clone());
        Json(handler.update_status(input).await)
    }

    #[tool(
        description = "Show the 10 most recent leave requests of a student, newest first.\nReturns a header line 'student_id, date, reason, status' followed by one comma-separated line per request."
    )]
    async fn leave_history(
        &self,
        Parameters(input): Parameters<LeaveHistoryInput>,
    ) -> Json<Outcome> {
        let handler = LeaveToolHandler::new(self.store.clone());
        Json(handler.leave_history(input).await)
    }

    #[tool(
        description = "List students ordered by name with limit/offset paging (default limit 100).\nReturns a header line 'student_id, student_name' followed by one comma-separated line per student."
    )]
    async fn list_students(
        &self,
        Parameters(input): Parameters<ListStudentsInput>,
    ) -> Json<Outcome> {
        let handler = StudentToolHandler::new(self.store.clone(), self.max_list_limit);
        Json(handler.list_students(input).await)
    }
}

#[tool_handler]
impl ServerHandler for LeaveTrackerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "leave-tracker-mcp".to_owned(),
                title: Some("Leave Tracker MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for managing student leave requests.\n\
                \n\
                ## Tools\n\
                - `submit_leave`: record a new pending request (one per student and date)\n\
                - `update_status`: set a request to pending, approved or rejected\n\
                - `leave_history`: the 10 most recent requests of a student\n\
                - `list_students`: students ordered by name, paged with limit/offset\n\
                \n\
                ## Results\n\
                Every tool returns `{kind, message}`. Branch on `kind`: success, empty, \
                not_found, already_exists, validation_error or datastore_error.\n\
                \n\
                ## Resources\n\
                `greeting://{name}` returns a short greeting."
                    .to_string(),
            ),
        }
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            self.resource_templates(),
        ))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_greeting(&uri).map_err(McpError::from)
    }
}
