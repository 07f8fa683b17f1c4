//! Synthetic tensors with known outliers.

use threadshape_core::types::Tensor3;

/// `f0`, `f1`, ...
pub fn feature_names(count: usize) -> Vec<String> {
    (0..count).map(|f| format!("f{f}")).collect()
}

/// Shape (2, 5, 3), all ones except conversation 4 at horizon index 1, which
/// is 10 for every feature.
pub fn spike_tensor() -> Tensor3 {
    Tensor3::from_fn([2, 5, 3], |h, c, _| if h == 1 && c == 4 { 10.0 } else { 1.0 })
}

/// Shape (2, 5, 3), all ones except conversations 0 and 3 at horizon index 1.
pub fn two_spike_tensor() -> Tensor3 {
    Tensor3::from_fn([2, 5, 3], |h, c, _| {
        if h == 1 && (c == 0 || c == 3) {
            10.0
        } else {
            1.0
        }
    })
}

/// Render a tensor as a JSONL corpus: conversation `c` gets id `c{c}`, the
/// given group label, a three-turn reply chain, and one feature list per
/// horizon starting at `first_horizon`. NaN cells become `null`.
pub fn corpus_jsonl(tensor: &Tensor3, groups: &[&str], first_horizon: usize) -> String {
    assert_eq!(groups.len(), tensor.conversations());
    let names = feature_names(tensor.features());
    let mut out = String::new();
    for (c, group) in groups.iter().enumerate() {
        let id = format!("c{c}");
        let convo = crate::corpus::conversation(&id, group, 3);
        let mut features = serde_json::Map::new();
        for h in 0..tensor.horizons() {
            let entries: Vec<serde_json::Value> = names
                .iter()
                .zip(tensor.fiber(h, c))
                .map(|(name, &v)| {
                    let value = if v.is_finite() { serde_json::json!(v) } else { serde_json::Value::Null };
                    serde_json::json!({ "name": name, "value": value })
                })
                .collect();
            features.insert((first_horizon + h).to_string(), serde_json::Value::Array(entries));
        }
        let line = serde_json::json!({
            "id": convo.id,
            "group": convo.group,
            "utterances": convo.utterances.iter().map(|u| serde_json::json!({
                "id": u.id,
                "author": u.author,
                "reply_to": u.reply_to,
                "timestamp": u.timestamp,
            })).collect::<Vec<_>>(),
            "features": features,
        });
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
