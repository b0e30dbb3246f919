use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Locates the path under which a spyglass crate is reachable from the crate
/// that invoked a proc-macro.
///
/// Generated code has to name `sg_reflect` items, but the invoking crate may
/// depend on `sg_reflect` directly, on the `spyglass` umbrella crate, or on
/// either of them under a renamed key. The caller's `Cargo.toml` decides.
///
/// # Example
///
/// ```rust
/// # use sg_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("sg_reflect"));
/// ```
///
/// # Resolution rules
///
/// 1. A dependency named (or renamed from) `name` gives `::key`.
/// 2. For a `sg_`-prefixed `name`, a dependency on `spyglass` gives
///    `::key::short_name` (e.g. `sg_reflect` -> `::spyglass::reflect`).
/// 3. Rules 1-2 are repeated for `dev-dependencies`.
/// 4. Otherwise `::name`.
///
/// A crate that uses its own derive needs `extern crate self as name;` at
/// its root so that rule 4 still resolves.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const UMBRELLA_NAME: &str = "spyglass";
const CRATE_PREFIX: &str = "sg_";

impl Manifest {
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    #[inline(never)]
    fn get_manifest_modified_time(
        cargo_manifest_path: &Path,
    ) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(cargo_manifest_path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_str<T: syn::parse::Parse>(path: &str) -> T {
        syn::parse_str(path).unwrap()
    }

    /// Returns the dependency key under which `package` is declared, looking
    /// through `package = "..."` renames.
    fn dependency_key<'t>(deps: &'t Table, package: &str) -> Option<&'t str> {
        deps.iter().find_map(|(key, item)| {
            let renamed = item
                .get("package")
                .and_then(Item::as_str)
                .is_some_and(|name| name == package);
            (key == package || renamed).then_some(key)
        })
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if let Some(key) = Self::dependency_key(deps, name) {
            return Some(Self::parse_str(&format!("::{key}")));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        let key = Self::dependency_key(deps, UMBRELLA_NAME)?;
        let mut path = Self::parse_str::<syn::Path>(&format!("::{key}"));
        path.segments.push(Self::parse_str(module));
        Some(path)
    }

    /// Returns the [`syn::Path`] for the crate `name` as seen from this
    /// manifest. See the type-level documentation for the rules.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(section)
                && let Some(path) = Self::find_in_deps(deps, name)
            {
                return path;
            }
        }

        Self::parse_str(&format!("::{name}"))
    }

    /// Runs `func` against the [`Manifest`] of the invoking crate.
    ///
    /// Manifests are parsed once and cached per path until the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use std::time::SystemTime;
    use toml_edit::Document;

    fn path_string(path: &syn::Path) -> String {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        format!("::{}", segments.join("::"))
    }

    fn manifest(source: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(String::from(source).into_boxed_str()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nsg_reflect = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("sg_reflect")), "::sg_reflect");
    }

    #[test]
    fn umbrella_dependency() {
        let m = manifest("[dependencies]\nspyglass = \"0.0.1\"\n");
        assert_eq!(
            path_string(&m.get_crate_path("sg_reflect")),
            "::spyglass::reflect"
        );
    }

    #[test]
    fn renamed_dependency() {
        let m = manifest("[dev-dependencies]\nsg = { package = \"spyglass\", version = \"0.0.1\" }\n");
        assert_eq!(path_string(&m.get_crate_path("sg_reflect")), "::sg::reflect");
    }

    #[test]
    fn fallback_to_absolute_path() {
        let m = manifest("[dependencies]\nserde = \"1\"\n");
        assert_eq!(path_string(&m.get_crate_path("sg_reflect")), "::sg_reflect");
    }
}
