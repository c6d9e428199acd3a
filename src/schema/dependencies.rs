use super::tables::{get_table, ALL_TABLES};
use super::types::{OnDelete, TableSchema};
use std::collections::{HashMap, HashSet, VecDeque};

/// Foreign-key graph over the table descriptors
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
    /// Map of table name -> tables that hold a cascading reference to it
    owned: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let mut deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        let mut owned: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();

        for table in ALL_TABLES {
            deps.insert(table.name, table.dependencies());

            for fk in table.foreign_keys {
                if fk.on_delete == OnDelete::Cascade {
                    owned.entry(fk.references_table).or_default().insert(table.name);
                }
            }
        }

        Self { deps, owned }
    }

    /// All tables in creation order (parents before children)
    pub fn creation_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in ALL_TABLES {
            if !visited.contains(table.name) {
                self.visit(table.name, &mut visited, &mut temp_visited, &mut result)?;
            }
        }

        Ok(result)
    }

    /// Tables whose rows are removed, directly or transitively, by a cascading
    /// delete of a row in `table`
    pub fn cascade_closure(&self, table: &str) -> Vec<&'static str> {
        let mut seen: HashSet<&'static str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([table]);

        while let Some(name) = queue.pop_front() {
            if let Some(children) = self.owned.get(name) {
                for &child in children {
                    if seen.insert(child) {
                        queue.push_back(child);
                    }
                }
            }
        }

        let mut closure: Vec<&'static str> = seen.into_iter().collect();
        closure.sort_unstable();
        closure
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<(), String> {
        if temp_visited.contains(name) {
            return Err(format!("Circular dependency detected at: {}", name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<&'static str> = deps.iter().copied().collect();
            deps.sort_unstable();
            for dep in deps {
                if dep != name {
                    self.visit(dep, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        match get_table(name) {
            Some(table) => result.push(table),
            None => return Err(format!("Unknown table: {}", name)),
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(names: &[&str], name: &str) -> usize {
        names.iter().position(|&n| n == name).unwrap()
    }

    #[test]
    fn test_creation_order_puts_parents_first() {
        let resolver = DependencyResolver::new();
        let tables = resolver.creation_order().unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        assert_eq!(names.len(), ALL_TABLES.len());
        assert!(position(&names, "universes") < position(&names, "sectors"));
        assert!(position(&names, "allegiances") < position(&names, "systems"));
        assert!(position(&names, "systems") < position(&names, "stars"));
        assert!(position(&names, "sophonts") < position(&names, "sophont_populations"));
        assert!(position(&names, "borders") < position(&names, "border_hexes"));
    }

    #[test]
    fn test_sector_cascade_reaches_system_children() {
        let resolver = DependencyResolver::new();
        let closure = resolver.cascade_closure("sectors");

        for table in ["systems", "stars", "trade_codes", "border_hexes", "region_hexes", "labels"] {
            assert!(closure.contains(&table), "missing {}", table);
        }
        assert!(!closure.contains(&"universes"));
        assert!(!closure.contains(&"metadata"));
    }

    #[test]
    fn test_set_null_reference_is_not_ownership() {
        let resolver = DependencyResolver::new();
        let closure = resolver.cascade_closure("allegiances");

        assert!(closure.contains(&"ruling_allegiances"));
        assert!(!closure.contains(&"systems"));
        assert!(!closure.contains(&"routes"));
    }
}
