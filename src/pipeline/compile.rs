// src/pipeline/compile.rs

//! Style-source compilation (Sass/SCSS/CSS → plain CSS) via `grass`.

use std::path::Path;

use grass::{Options, OutputStyle};

use crate::errors::{Result, StylepipeError};
use crate::fs::{FileSystem, SassFs};
use crate::pipeline::sources::SourceFile;

/// Compile one style-source to expanded CSS.
///
/// Imports resolve relative to the importing file first, then against
/// `load_root` (the source directory), all through `fs`.
pub fn compile_source(fs: &dyn FileSystem, file: &SourceFile, load_root: &Path) -> Result<String> {
    let sass_fs = SassFs::new(fs);
    let options = Options::default()
        .fs(&sass_fs)
        .style(OutputStyle::Expanded)
        .load_path(load_root);

    grass::from_path(&file.path, &options).map_err(|err| StylepipeError::CompileError {
        file: file.path.clone(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::pipeline::sources::SourceKind;
    use std::path::PathBuf;

    fn scss(path: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            rel: path.rsplit('/').next().unwrap_or(path).to_string(),
            kind: SourceKind::Scss,
        }
    }

    #[test]
    fn compiles_variables_and_nesting() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "sass/card.scss",
            "$accent: red;\n.card {\n  .title { color: $accent; }\n}\n",
        );

        let css = compile_source(&fs, &scss("sass/card.scss"), Path::new("sass")).unwrap();
        assert!(css.contains(".card .title"));
        assert!(css.contains("color: red"));
        assert!(!css.contains("$accent"));
    }

    #[test]
    fn syntax_error_names_the_file() {
        let fs = MockFileSystem::new();
        fs.add_file("sass/broken.scss", ".x { color: red;\n");

        let err = compile_source(&fs, &scss("sass/broken.scss"), Path::new("sass")).unwrap_err();
        match err {
            StylepipeError::CompileError { file, message } => {
                assert_eq!(file, PathBuf::from("sass/broken.scss"));
                assert!(!message.is_empty());
            }
            other => panic!("expected CompileError, got {other:?}"),
        }
    }
}
