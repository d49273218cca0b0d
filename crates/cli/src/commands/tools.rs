//! Tool listing

use anyhow::Result;
use osmos_common::ToolDescriptor;
use osmos_mcp::Dispatcher;
use serde::Serialize;
use serde_json::Value;

use crate::output::{print_list, OutputFormat, TableDisplay};

/// Tool information for display
#[derive(Serialize, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub arguments: Vec<String>,
}

impl From<&ToolDescriptor> for ToolInfo {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            arguments: argument_names(&tool.input_schema),
        }
    }
}

impl TableDisplay for ToolInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Tool", "Description", "Arguments"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            if self.arguments.is_empty() {
                "-".to_string()
            } else {
                self.arguments.join(", ")
            },
        ]
    }
}

/// Property names of an input schema; required ones are suffixed with `*`
fn argument_names(schema: &Value) -> Vec<String> {
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    schema["properties"]
        .as_object()
        .map(|props| {
            props
                .keys()
                .map(|k| {
                    if required.contains(&k.as_str()) {
                        format!("{}*", k)
                    } else {
                        k.clone()
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn execute(dispatcher: &Dispatcher, format: OutputFormat) -> Result<()> {
    let tools: Vec<ToolInfo> = dispatcher.list_tools().iter().map(ToolInfo::from).collect();
    print_list(&tools, format);
    Ok(())
}
