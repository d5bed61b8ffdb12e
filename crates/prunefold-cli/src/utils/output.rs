use std::path::{Path, PathBuf};

/// Appends the 1-based solution rank to the stem of `template`.
///
/// `out.pdb` becomes `out_1.pdb`, `out_2.pdb`, ...; a template without an extension
/// gets `.pdb`.
pub fn solution_path(template: &Path, rank: usize) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "solution".to_string());
    let extension = template
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdb".to_string());
    template.with_file_name(format!("{stem}_{rank}.{extension}"))
}
