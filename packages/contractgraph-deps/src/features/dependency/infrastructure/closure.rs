/*
 * Transitive closure engine
 *
 * One scope's raw one-hop table is a directed graph: keys are nodes, set
 * members are edges. Full passes run until a pass makes no change; each pass
 * accumulates its additions against a consistent snapshot before applying
 * any of them. The domain of values in a scope is finite and sets only grow,
 * so the fixed point is reached in finitely many passes.
 */

use super::super::domain::tables::{DepMap, DepSet};

/// Close `table` under reachability, in place.
pub fn close(table: &mut DepMap) {
    loop {
        let mut additions: Vec<(crate::shared::models::ValueId, DepSet)> = Vec::new();

        for (&key, deps) in table.iter() {
            let mut gained = DepSet::default();
            for &mid in deps {
                if mid == key {
                    continue;
                }
                let Some(transitive) = table.get(&mid) else {
                    continue;
                };
                for &dep in transitive {
                    if dep != key && !deps.contains(&dep) {
                        gained.insert(dep);
                    }
                }
            }
            if !gained.is_empty() {
                additions.push((key, gained));
            }
        }

        if additions.is_empty() {
            break;
        }
        for (key, gained) in additions {
            if let Some(deps) = table.get_mut(&key) {
                deps.extend(gained);
            }
        }
    }
}
