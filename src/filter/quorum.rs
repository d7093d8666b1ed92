//! Combining per-file gene sets by occurrence count

use std::collections::BTreeMap;

use super::QualifyingSet;

/// Genes that qualified in enough files, in lexicographic order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedGenes {
    genes: Vec<String>,
}

impl SelectedGenes {
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.index_of(gene).is_some()
    }

    /// Position of a gene in the output order
    pub fn index_of(&self, gene: &str) -> Option<usize> {
        self.genes.binary_search_by(|g| g.as_str().cmp(gene)).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.genes
    }
}

impl FromIterator<String> for SelectedGenes {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut genes: Vec<String> = iter.into_iter().collect();
        genes.sort_unstable();
        genes.dedup();
        Self { genes }
    }
}

/// Number of sets each gene appears in
pub fn occurrence_counts<'a, I>(sets: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a QualifyingSet>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for set in sets {
        for gene in &set.genes {
            *counts.entry(gene.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Keep the genes that appear in at least `min_files` of the sets
pub fn select_genes<'a, I>(sets: I, min_files: usize) -> SelectedGenes
where
    I: IntoIterator<Item = &'a QualifyingSet>,
{
    let sets: Vec<&QualifyingSet> = sets.into_iter().collect();
    let selected: SelectedGenes = occurrence_counts(sets.iter().copied())
        .into_iter()
        .filter(|&(_, count)| count >= min_files)
        .map(|(gene, _)| gene)
        .collect();
    log::info!(
        "{} genes qualify in at least {} of {} files",
        selected.len(),
        min_files,
        sets.len()
    );
    selected
}
