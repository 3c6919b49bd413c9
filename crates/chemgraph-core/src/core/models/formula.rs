use std::collections::BTreeMap;
use std::fmt;

/// Element-symbol counts of a molecule or model, expanded down to elements and
/// including implicit hydrogens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula(pub(crate) BTreeMap<String, usize>);

impl Formula {
    pub fn get(&self, symbol: &str) -> usize {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(symbol, &count)| (symbol.as_str(), count))
    }

    pub(crate) fn add(&mut self, symbol: &str, count: usize) {
        if count > 0 {
            *self.0.entry(symbol.to_string()).or_default() += count;
        }
    }

    pub(crate) fn merge(&mut self, other: &Formula) {
        for (symbol, count) in other.iter() {
            self.add(symbol, count);
        }
    }

    /// Symbols in Hill order: carbon, then hydrogen, then the rest alphabetically.
    /// Without carbon every symbol is alphabetical.
    pub fn hill_order(&self) -> Vec<(&str, usize)> {
        let has_carbon = self.0.contains_key("C");
        let mut entries: Vec<(&str, usize)> = Vec::with_capacity(self.0.len());
        if has_carbon {
            entries.push(("C", self.get("C")));
            if let Some(&h) = self.0.get("H") {
                entries.push(("H", h));
            }
        }
        entries.extend(
            self.iter()
                .filter(|(symbol, _)| !has_carbon || (*symbol != "C" && *symbol != "H")),
        );
        entries
    }
}

impl From<BTreeMap<String, usize>> for Formula {
    fn from(counts: BTreeMap<String, usize>) -> Self {
        Self(counts.into_iter().filter(|(_, c)| *c > 0).collect())
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, count) in self.hill_order() {
            match count {
                1 => write!(f, "{symbol}")?,
                n => write!(f, "{symbol}{n}")?,
            }
        }
        Ok(())
    }
}
