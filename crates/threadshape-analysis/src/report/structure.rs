//! Reply-tree rendering of a conversation.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use threadshape_core::types::Conversation;

/// One utterance placed in the reply tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureLine {
    /// Distance from the thread root; roots are depth 0.
    pub depth: usize,
    /// 0-based chronological position within the conversation.
    pub position: usize,
    pub author: String,
    pub utterance_id: String,
}

impl StructureLine {
    pub fn render(&self) -> String {
        format!("{}{}. {}", "  ".repeat(self.depth), self.position, self.author)
    }
}

/// Pre-order walk of the reply tree.
///
/// Roots are utterances whose parent is absent or unresolvable. Siblings and
/// roots are ordered chronologically. Utterances caught in a reply cycle are
/// emitted as extra roots so every utterance appears exactly once.
pub fn reply_tree(conversation: &Conversation) -> Vec<StructureLine> {
    let positions = conversation.chronological_positions();
    let utterances = &conversation.utterances;

    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(utterances.len(), utterances.len());
    let nodes: Vec<NodeIndex> = (0..utterances.len()).map(|i| graph.add_node(i)).collect();
    let mut by_id: FxHashMap<&str, NodeIndex> = FxHashMap::default();
    for (i, utt) in utterances.iter().enumerate() {
        by_id.entry(utt.id.as_str()).or_insert(nodes[i]);
    }

    let mut roots = Vec::new();
    for (i, utt) in utterances.iter().enumerate() {
        let parent = utt
            .reply_to
            .as_deref()
            .and_then(|p| by_id.get(p).copied())
            .filter(|&p| p != nodes[i]);
        match parent {
            Some(p) => {
                graph.add_edge(p, nodes[i], ());
            }
            None => roots.push(nodes[i]),
        }
    }

    let position_of = |n: NodeIndex| positions[graph[n]];
    roots.sort_by_key(|&n| position_of(n));

    let mut visited = vec![false; utterances.len()];
    let mut lines = Vec::with_capacity(utterances.len());
    let walk = |start: NodeIndex, lines: &mut Vec<StructureLine>, visited: &mut Vec<bool>| {
        let mut stack = vec![(start, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let idx = graph[node];
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            let utt = &utterances[idx];
            lines.push(StructureLine {
                depth,
                position: positions[idx],
                author: utt.author.clone(),
                utterance_id: utt.id.clone(),
            });
            let mut children: Vec<NodeIndex> = graph.neighbors_directed(node, Direction::Outgoing).collect();
            // pushed latest first so the earliest child is popped next
            children.sort_by_key(|&c| std::cmp::Reverse(position_of(c)));
            stack.extend(children.into_iter().map(|c| (c, depth + 1)));
        }
    };

    for root in roots {
        walk(root, &mut lines, &mut visited);
    }

    let mut orphans: Vec<NodeIndex> = nodes.iter().copied().filter(|n| !visited[graph[*n]]).collect();
    orphans.sort_by_key(|&n| position_of(n));
    for orphan in orphans {
        if !visited[graph[orphan]] {
            walk(orphan, &mut lines, &mut visited);
        }
    }

    lines
}

/// Render lines as `"{indent}{position}. {author}"`.
pub fn render_lines(lines: &[StructureLine]) -> Vec<String> {
    lines.iter().map(StructureLine::render).collect()
}
