//! Test utilities for building temporary source trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary source tree for testing.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a text file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        self.add_bytes(path, content.as_bytes())
    }

    /// Add a file with raw bytes, creating parent directories as needed.
    pub fn add_bytes(&self, path: &str, content: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Populate a small front-end project under `src/`.
    pub fn frontend() -> Self {
        let tree = Self::new();
        tree.add_file("src/main.tsx", "import App from './app/App';");
        tree.add_file("src/app/App.tsx", "export default function App() {}");
        tree.add_file("src/app/App.css", ".app { color: red; }");
        tree.add_file("src/styles/index.css", "body { margin: 0; }");
        tree.add_file("src/styles/theme.css", ":root { --x: 1; }");
        tree.add_file("src/components/ui/Button.tsx", "export const Button = () => null;");
        tree.add_file("src/components/layout/Header.tsx", "export const Header = () => null;");
        tree.add_file("src/catalog/Card.module.css", ".card { padding: 1rem; }");
        tree.add_file("src/catalog/products.json", "[{\"id\": 1}]");
        tree.add_file("src/catalog/CatalogPage.tsx", "export const CatalogPage = 1;");
        tree.add_file("src/landing/empty.ts", "   \n");
        tree.add_file("src/landing/Hero.tsx", "export const Hero = 1;");
        tree.add_file("src/data/categories.json", "{\"categories\": [\"pumps\"]}");
        tree.add_file("src/data/products.ts", "export const products = [];");
        tree.add_file("src/assets/logo.png", "\u{89}PNG");
        tree.add_file("src/node_modules/left-pad/index.js", "module.exports = 1;");
        tree.add_file("src/.DS_Store", "junk");
        tree
    }

    /// The `src/` directory of a tree built with [`TestTree::frontend`].
    pub fn src(&self) -> PathBuf {
        self.path().join("src")
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
