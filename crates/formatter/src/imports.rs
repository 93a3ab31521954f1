//! Import requirements of one generated file

use crate::names::{import_alias, import_path};
use protoc_gen_tsd_common::ImportDeclaration;

/// Imports in first-reference order, one per owning file
#[derive(Debug)]
pub struct ImportSet {
    from: String,
    imports: Vec<ImportDeclaration>,
}

impl ImportSet {
    pub fn new(from: &str) -> Self {
        Self {
            from: from.to_string(),
            imports: Vec::new(),
        }
    }

    /// Record that `file_name` must be imported and return its alias
    pub fn require(&mut self, file_name: &str) -> &str {
        let index = match self.imports.iter().position(|i| i.file_name == file_name) {
            Some(index) => index,
            None => {
                let alias = self.unique_alias(import_alias(file_name));
                self.imports.push(ImportDeclaration {
                    alias,
                    path: import_path(&self.from, file_name),
                    file_name: file_name.to_string(),
                });
                self.imports.len() - 1
            }
        };

        &self.imports[index].alias
    }

    /// Distinct files can sanitize to the same alias (`a/b.proto`, `a_b.proto`)
    fn unique_alias(&self, base: String) -> String {
        let taken = |alias: &str| self.imports.iter().any(|i| i.alias == alias);
        if !taken(&base) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}{}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn into_vec(self) -> Vec<ImportDeclaration> {
        self.imports
    }
}
