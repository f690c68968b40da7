//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization. Together
//! they describe the fixed source layout the bundler was built for.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn root_document() -> PathBuf {
        "index.html".into()
    }

    pub fn pages() -> PathBuf {
        "pages".into()
    }
}

// ============================================================================
// [css] Section Defaults
// ============================================================================

pub mod css {
    use std::path::PathBuf;

    pub fn sources() -> Vec<PathBuf> {
        vec!["css/styles.css".into(), "css/custom.css".into()]
    }

    pub fn bundle() -> PathBuf {
        "css/bundle.min.css".into()
    }
}

// ============================================================================
// [js] Section Defaults
// ============================================================================

pub mod js {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "js".into()
    }

    pub fn scripts() -> Vec<String> {
        vec!["scripts.js".into(), "okna-prices.js".into(), "form.js".into()]
    }

    pub fn vendor() -> Vec<String> {
        vec!["bootstrap.bundle.min.js".into()]
    }
}

// ============================================================================
// [assets] Section Defaults
// ============================================================================

pub mod assets {
    use std::path::PathBuf;

    pub fn dirs() -> Vec<PathBuf> {
        vec!["assets".into(), "fonts".into(), "FontAwesome".into()]
    }

    pub fn favicon() -> Option<PathBuf> {
        Some("assets/favicon.ico".into())
    }
}

// ============================================================================
// [safelist] Section Defaults
// ============================================================================

/// Bootstrap toggles these classes from its bundled script, so they never
/// appear in static markup.
pub mod safelist {
    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    pub fn standard() -> Vec<String> {
        patterns(&[
            "/^navbar/", "/^nav-/", "/^collapse/", "/^dropdown/", "/^modal/", "/^btn/",
            "/^badge/", "/^show$/", "/^fade$/", "/^active$/", "/^disabled$/",
            "/^collapsed$/", "/^navbar-shrink$/", "/^d-/", "/^flex-/", "/^align-/",
            "/^justify-/", "/^gap-/", "/^g-/", "/^row-cols/", "/^col$/", "/^col-/",
            "/^row$/", "/^container/", "/^mx-/", "/^my-/", "/^mt-/", "/^mb-/", "/^ms-/",
            "/^me-/", "/^p-/", "/^px-/", "/^py-/", "/^text-/", "/^bg-/", "/^border/",
            "/^rounded/", "/^rounded-/", "/^shadow/", "/^opacity/", "/^fs-/", "/^fw-/",
            "/^lh-/", "/^overflow/", "/^position-/", "/^fixed-/", "/^sticky-/", "/^top-/",
            "/^bottom-/", "/^start-/", "/^end-/", "/^w-/", "/^h-/", "/^mw-/", "/^mh-/",
            "/^min-vw/", "/^min-vh/", "/^vw-/", "/^vh-/", "/^visible$/", "/^invisible$/",
            "/^pe-/", "/^ps-/", "/^py-lg-/", "/^text-lg-/", "/^d-lg-/", "/^d-none/",
            "/^needs-validation$/", "/^was-validated$/", "/^form-/", "/^input-/",
            "/^invalid-/", "/^valid-/", "/^carousel/", "/^slide$/", "/^list-group/",
            "/^card-group/", "/^offcanvas/", "/^tooltip/", "/^popover/", "/^toast/",
            "/^alert/", "/^progress/", "/^spinner/", "/^ratio$/", "/^ratio-/",
            "/^figure/", "/^img-/", "/^object-fit/",
        ])
    }

    pub fn deep() -> Vec<String> {
        patterns(&[
            "/^bs-tooltip/", "/^bs-popover/", "/^modal-backdrop/", "/^offcanvas-backdrop/",
        ])
    }

    pub fn greedy() -> Vec<String> {
        patterns(&[
            "/^navbar/", "/^collapse/", "/^dropdown/", "/^modal/", "/^btn/", "/^nav-link/",
            "/^card/", "/^row/", "/^col/", "/^container/", "/^form-control/",
            "/^form-label/", "/^form-select/", "/^form-check/",
        ])
    }
}
