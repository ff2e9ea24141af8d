use crate::label::Label;
use crate::resolve::diagnostics::IndexDiagnostic;
use crate::resolve::index::RuleRecord;
use crate::resolve::ImportSpec;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Directed graph of embed edges between indexed rules. Node `i` is
/// record `i`; edges to labels outside the index are not represented.
type EmbedGraph = DiGraph<(), ()>;

/// Compute the transitive embed closure of every record.
///
/// Components are processed in reverse topological order so every
/// embedded rule is final before its embedder reads it. A rule embedded by
/// a same-language rule outside its own component is marked `embedded`,
/// along with the rest of its component in that language. Components with
/// more than one member (or a self-embed) are merged and reported as
/// cycles.
pub(crate) fn collect_embeds(
    records: &mut [RuleRecord<'_>],
    label_map: &HashMap<Label, usize>,
) -> Vec<IndexDiagnostic> {
    let direct: Vec<Vec<Label>> = records
        .iter()
        .map(|r| {
            r.resolver
                .embeds(r.rule, &r.label)
                .into_iter()
                .map(|e| e.abs(&r.label.repo, &r.label.pkg))
                .collect()
        })
        .collect();

    // Indexed targets of each record's embeds, in declaration order.
    let targets: Vec<Vec<usize>> = direct
        .iter()
        .map(|labels| {
            labels
                .iter()
                .filter_map(|l| label_map.get(l).copied())
                .collect()
        })
        .collect();

    let graph = build_graph(&targets);
    let components: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .map(|scc| {
            let mut members: Vec<usize> = scc.into_iter().map(NodeIndex::index).collect();
            members.sort_unstable();
            members
        })
        .collect();
    let mut component_of = vec![0; records.len()];
    for (ci, members) in components.iter().enumerate() {
        for &m in members {
            component_of[m] = ci;
        }
    }

    let mut diagnostics = Vec::new();

    for members in &components {
        let cyclic = members.len() > 1 || targets[members[0]].contains(&members[0]);

        let mut imported_as: Vec<ImportSpec> = members
            .iter()
            .flat_map(|&m| records[m].imported_as.iter().cloned())
            .collect();
        // Per member: labels this member contributes to same-language closures.
        let mut contributed: Vec<Vec<Label>> = Vec::with_capacity(members.len());

        for &x in members {
            let mut labels = direct[x].clone();
            for &child in &targets[x] {
                if members.binary_search(&child).is_ok() {
                    continue;
                }
                if records[child].lang == records[x].lang {
                    // Embedding one cycle member embeds the whole cycle.
                    for &y in &components[component_of[child]] {
                        if records[y].lang == records[x].lang {
                            records[y].embedded = true;
                        }
                    }
                    labels.extend(records[child].embeds.iter().cloned());
                }
                imported_as.extend(records[child].imported_as.iter().cloned());
            }
            contributed.push(labels);
        }

        for &m in members {
            let mut embeds: Vec<Label> = members
                .iter()
                .zip(&contributed)
                .filter(|(x, _)| records[**x].lang == records[m].lang)
                .flat_map(|(_, labels)| labels.iter().cloned())
                .collect();
            if cyclic {
                let own = &records[m].label;
                embeds.retain(|l| l != own);
            }
            let record = &mut records[m];
            record.embeds = embeds;
            record.imported_as = imported_as.clone();
        }

        if cyclic {
            let labels: Vec<Label> = members.iter().map(|&m| records[m].label.clone()).collect();
            let diag = IndexDiagnostic::EmbedCycle { members: labels };
            tracing::warn!("{diag}");
            diagnostics.push(diag);
        }
    }

    diagnostics
}

fn build_graph(targets: &[Vec<usize>]) -> EmbedGraph {
    let mut graph = EmbedGraph::with_capacity(targets.len(), 0);
    let nodes: Vec<NodeIndex> = (0..targets.len()).map(|_| graph.add_node(())).collect();
    for (from, tos) in targets.iter().enumerate() {
        for &to in tos {
            graph.update_edge(nodes[from], nodes[to], ());
        }
    }
    graph
}
