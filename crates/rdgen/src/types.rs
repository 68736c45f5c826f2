//! Collection types shared by the analysis passes.

type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// Insertion-ordered map. Iteration order follows declaration order of the grammar.
pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

/// Insertion-ordered set.
pub type Set<T> = indexmap::IndexSet<T, BuildHasher>;
