//! Workflow graph: an ordered list of nodes linked by child edges.
//!
//! `nodes[0]` is the start node and the last node is the end sentinel; new
//! actions are always spliced in just before the end.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::layout::{Layout, Widget};
use crate::properties::{ActionProperties, WidgetKind};
use crate::types::{NodeId, WorkflowId};

/// Fewest nodes a workflow needs before actions can be spliced in.
pub const MIN_SPLICE_NODES: usize = 2;

// ---------------------------------------------------------------------------
// Nodes and edges
// ---------------------------------------------------------------------------

/// Outgoing edge of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub to: NodeId,
}

impl Edge {
    pub fn to(id: NodeId) -> Self {
        Self { to: id }
    }
}

/// A vertex of the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub properties: ActionProperties,
    pub children: Vec<Edge>,
}

impl Node {
    /// Wrap a raw node, filling in whatever is missing.
    ///
    /// A missing id becomes a fresh UUID, a missing name or type an empty
    /// string. The type is taken from `widgetType` when present and from
    /// `type` otherwise.
    pub fn from_json(json: &Value) -> Self {
        let node_type = json
            .get("widgetType")
            .filter(|v| !v.is_null())
            .or_else(|| json.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let kind = WidgetKind::parse(&node_type);

        let children = json
            .get("children")
            .and_then(Value::as_array)
            .map(|edges| {
                edges
                    .iter()
                    .filter_map(|edge| {
                        let to = edge.get("to").and_then(NodeId::from_value);
                        if to.is_none() {
                            tracing::warn!(edge = %edge, "Dropping edge without a target");
                        }
                        to.map(Edge::to)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: json
                .get("id")
                .and_then(NodeId::from_value)
                .unwrap_or_else(NodeId::generate),
            name: json
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            properties: ActionProperties::decode_lenient(
                &kind,
                json.get("properties").cloned().unwrap_or(Value::Null),
            ),
            node_type,
            children,
        }
    }

    /// The graph-side counterpart of a layout widget.
    pub fn from_widget(widget: &Widget) -> Self {
        Self {
            id: widget.id.clone(),
            name: widget.name.clone(),
            node_type: widget.widget_type.clone(),
            properties: widget.properties.clone(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        WidgetKind::parse(&self.node_type)
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflow {
    /// `None` until the workflow has been saved once.
    pub id: Option<WorkflowId>,
    pub uuid: String,
    pub name: String,
    pub properties: Map<String, Value>,
    pub nodes: Vec<Node>,
}

impl Workflow {
    /// Read workflow metadata from its JSON document. Nodes are loaded
    /// separately with [`load_nodes`](Self::load_nodes).
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: json.get("id").and_then(WorkflowId::from_value),
            uuid: json
                .get("uuid")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: json
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            properties: json
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            nodes: Vec::new(),
        }
    }

    /// Replace the node list with the nodes of a workflow document.
    ///
    /// Duplicate ids are not detected here; see [`validate`](Self::validate).
    pub fn load_nodes(&mut self, json: &Value) {
        self.nodes = json
            .get("nodes")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().map(Node::from_json).collect())
            .unwrap_or_default();
    }

    /// First node with `id`, in list order.
    pub fn node_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn start(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn end(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// Check that `node` could be spliced in without touching the graph.
    pub fn check_splice(&self, node: &Node) -> Result<(), CoreError> {
        if self.nodes.len() < MIN_SPLICE_NODES {
            return Err(CoreError::Validation(format!(
                "Workflow needs a start and an end node to insert '{}', has {} node(s)",
                node.name,
                self.nodes.len()
            )));
        }
        if self.node_by_id(&node.id).is_some() {
            return Err(CoreError::Validation(format!(
                "Workflow already has a node with id {}",
                node.id
            )));
        }
        Ok(())
    }

    /// Insert a new action just before the end node.
    ///
    /// The action gets a single edge to the end node and the start node's
    /// edges are replaced by a single edge to the action. On error the
    /// graph is left untouched.
    pub fn splice_action(&mut self, mut node: Node) -> Result<(), CoreError> {
        self.check_splice(&node)?;

        let end = self
            .nodes
            .pop()
            .ok_or_else(|| CoreError::Validation("Workflow has no end node".to_string()))?;

        let node_id = node.id.clone();
        node.children = vec![Edge::to(end.id.clone())];
        self.nodes.push(node);
        self.nodes.push(end);

        self.nodes[0].children = vec![Edge::to(node_id.clone())];

        tracing::debug!(node_id = %node_id, node_count = self.nodes.len(), "Spliced action into workflow");
        Ok(())
    }

    /// Every `(from, to)` edge whose target is not a node of this workflow.
    pub fn dangling_edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.children
                    .iter()
                    .filter(|edge| self.node_by_id(&edge.to).is_none())
                    .map(move |edge| (node.id.clone(), edge.to.clone()))
            })
            .collect()
    }

    /// Check graph integrity: unique node ids and no dangling edges.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.nodes.iter().find(|n| !seen.insert(&n.id)) {
            return Err(CoreError::Validation(format!(
                "Duplicate node id {}",
                dup.id
            )));
        }

        let dangling = self.dangling_edges();
        if !dangling.is_empty() {
            let edges: Vec<String> = dangling
                .iter()
                .map(|(from, to)| format!("{from} -> {to}"))
                .collect();
            return Err(CoreError::Validation(format!(
                "Edges point at missing nodes: {}",
                edges.join(", ")
            )));
        }
        Ok(())
    }

    /// Check that every widget of `layout` renders a node of this workflow.
    pub fn validate_layout(&self, layout: &Layout) -> Result<(), CoreError> {
        let orphans: Vec<&str> = layout
            .widget_ids()
            .filter(|id| self.node_by_id(id).is_none())
            .map(NodeId::as_str)
            .collect();

        if orphans.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Widgets without a workflow node: {}",
                orphans.join(", ")
            )))
        }
    }

    /// The workflow document form, as sent to the server.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("Workflow is always serialisable")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::layout::load_layout;

    fn three_node_workflow() -> Workflow {
        let doc = json!({
            "id": 7,
            "uuid": "wf-uuid",
            "name": "daily",
            "nodes": [
                {"id": "1", "name": "Start", "type": "start-widget", "children": [{"to": "3"}]},
                {"id": "2", "name": "Kill", "type": "kill-widget"},
                {"id": "3", "name": "End", "type": "end-widget"},
            ]
        });
        let mut workflow = Workflow::from_json(&doc);
        workflow.load_nodes(&doc);
        workflow
    }

    // -- Node construction --------------------------------------------------

    #[test]
    fn node_defaults_missing_fields() {
        let node = Node::from_json(&json!({}));
        assert!(uuid::Uuid::parse_str(node.id.as_str()).is_ok());
        assert_eq!(node.name, "");
        assert_eq!(node.node_type, "");
        assert_eq!(node.properties, ActionProperties::default());
        assert!(node.children.is_empty());
    }

    #[test]
    fn node_generated_ids_differ() {
        let a = Node::from_json(&json!({"id": null}));
        let b = Node::from_json(&json!({"id": null}));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn node_type_falls_back_to_type_field() {
        let node = Node::from_json(&json!({"type": "hive"}));
        assert_eq!(node.node_type, "hive");
        assert_eq!(node.kind(), WidgetKind::Hive);
    }

    #[test]
    fn node_widget_type_wins_over_type() {
        let node = Node::from_json(&json!({"type": "x", "widgetType": "pig-widget"}));
        assert_eq!(node.node_type, "pig-widget");
    }

    #[test]
    fn node_reads_children_and_drops_targetless_edges() {
        let node = Node::from_json(&json!({"children": [{"to": "a"}, {"to": null}, {}]}));
        assert_eq!(node.children, vec![Edge::to(NodeId::from("a"))]);
    }

    // -- Workflow metadata --------------------------------------------------

    #[test]
    fn workflow_from_json_defaults() {
        let workflow = Workflow::from_json(&json!({}));
        assert!(workflow.id.is_none());
        assert!(!workflow.uuid.is_empty());
        assert_eq!(workflow.name, "");
        assert!(workflow.properties.is_empty());
        assert!(workflow.nodes.is_empty());
    }

    #[test]
    fn load_nodes_replaces_list() {
        let mut workflow = three_node_workflow();
        assert_eq!(workflow.id, Some(WorkflowId::new("7")));
        assert_eq!(workflow.nodes.len(), 3);

        workflow.load_nodes(&json!({"nodes": [{"id": "x"}]}));
        assert_eq!(workflow.nodes.len(), 1);
    }

    // -- Lookup -------------------------------------------------------------

    #[test]
    fn node_by_id_finds_match_or_none() {
        let workflow = three_node_workflow();
        assert_eq!(
            workflow.node_by_id(&NodeId::from("2")).map(|n| n.name.as_str()),
            Some("Kill")
        );
        assert!(workflow.node_by_id(&NodeId::from("9")).is_none());
    }

    #[test]
    fn node_by_id_first_match_wins() {
        let mut workflow = Workflow::from_json(&json!({}));
        workflow.load_nodes(&json!({"nodes": [
            {"id": "a", "name": "first"},
            {"id": "a", "name": "second"},
        ]}));
        assert_eq!(workflow.node_by_id(&NodeId::from("a")).unwrap().name, "first");
    }

    // -- Splicing -----------------------------------------------------------

    #[test]
    fn splice_inserts_before_end_and_relinks_start() {
        let mut workflow = three_node_workflow();
        let node = Node::from_widget(&crate::layout::Widget::new("Hive Script", "hive-widget"));
        let id = node.id.clone();

        workflow.splice_action(node).unwrap();

        assert_eq!(workflow.nodes.len(), 4);
        assert_eq!(workflow.nodes[2].id, id);
        assert_eq!(workflow.end().unwrap().id, NodeId::from("3"));
        assert_eq!(workflow.start().unwrap().children, vec![Edge::to(id.clone())]);
        assert_eq!(workflow.nodes[2].children, vec![Edge::to(NodeId::from("3"))]);
        assert!(workflow.validate().is_ok());
    }

    #[test]
    fn splice_requires_start_and_end() {
        let mut workflow = Workflow::from_json(&json!({}));
        workflow.load_nodes(&json!({"nodes": [{"id": "only"}]}));

        let err = workflow
            .splice_action(Node::from_json(&json!({"name": "x"})))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(workflow.nodes.len(), 1);
    }

    #[test]
    fn splice_rejects_duplicate_id() {
        let mut workflow = three_node_workflow();
        let err = workflow
            .splice_action(Node::from_json(&json!({"id": "2"})))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m) if m.contains("already"));
        assert_eq!(workflow.nodes.len(), 3);
    }

    // -- Validation ---------------------------------------------------------

    #[test]
    fn dangling_edges_are_reported() {
        let mut workflow = three_node_workflow();
        workflow.nodes[1].children.push(Edge::to(NodeId::from("ghost")));

        assert_eq!(
            workflow.dangling_edges(),
            vec![(NodeId::from("2"), NodeId::from("ghost"))]
        );
        let err = workflow.validate().unwrap_err();
        assert!(err.to_string().contains("2 -> ghost"));
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let mut workflow = three_node_workflow();
        workflow.nodes.push(Node::from_json(&json!({"id": "1"})));
        assert!(workflow.validate().unwrap_err().to_string().contains("Duplicate"));
    }

    #[test]
    fn layout_widgets_must_have_nodes() {
        let workflow = three_node_workflow();
        let good = load_layout(&json!([{"size": 12, "rows": [{"widgets": [{"id": "1"}, {"id": "3"}]}]}]));
        assert!(workflow.validate_layout(&good).is_ok());

        let bad = load_layout(&json!([{"size": 12, "rows": [{"widgets": [{"id": "1"}, {"id": "zz"}]}]}]));
        let err = workflow.validate_layout(&bad).unwrap_err();
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn serializes_with_type_key() {
        let doc = three_node_workflow().to_value();
        assert_eq!(doc["id"], "7");
        assert_eq!(doc["nodes"][0]["type"], "start-widget");
        assert_eq!(doc["nodes"][0]["children"], json!([{"to": "3"}]));
    }
}
