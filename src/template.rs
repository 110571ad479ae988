//! Compose template selection and rendering.
//!
//! Templates are jinja-style `<name>.yaml.j2` files rendered with tera.
//! The parameter map is exposed to the template under `env`, so documents
//! reference `{{ env.JFIT_RE_IMAGE }}`, iterate `env.DEVICE_LIST`, and so
//! on. Rendering is a pure substitution pass: no defaults are synthesized,
//! and an undefined reference is a template-authoring error surfaced as a
//! render failure.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::AssembleError;
use crate::image::ResolvedImage;
use crate::layout::IMAGE_PREFIX;
use crate::manifest::Value;
use crate::roles::Role;

/// Template file extension.
const TEMPLATE_EXT: &str = ".yaml.j2";

/// Suffix of the specialized training-engine template.
const TRAINING_SUFFIX: &str = "_training";

/// Template path for a role's resolved image name.
///
/// The training-engine role requires its own specialized template, not the
/// generic per-name one, even when both exist.
#[must_use]
pub fn template_path(templates_dir: &Path, role: Role, image_name: &str) -> PathBuf {
    let file = if role == Role::TrainingEngine {
        format!("{image_name}{TRAINING_SUFFIX}{TEMPLATE_EXT}")
    } else {
        format!("{image_name}{TEMPLATE_EXT}")
    };
    templates_dir.join(file)
}

/// Optional role configuration file: the image name with the packaging
/// prefix stripped, `.conf` appended, under the role's subdirectory of the
/// group.
#[must_use]
pub fn conf_path(group_dir: &Path, role: Role, image_name: &str) -> PathBuf {
    let stem = image_name.strip_prefix(IMAGE_PREFIX).unwrap_or(image_name);
    group_dir
        .join(role.manifest_key().to_lowercase())
        .join(format!("{stem}.conf"))
}

/// Render one service-definition document for a role.
///
/// # Errors
///
/// Returns [`AssembleError::TemplateMissing`] / [`AssembleError::TemplateEmpty`]
/// per the selection rule, or [`AssembleError::Render`] when the template
/// references parameters the map does not hold.
pub fn render(
    role: Role,
    image: &ResolvedImage,
    group_params: &BTreeMap<String, Value>,
    conf_file: &Path,
    templates_dir: &Path,
) -> Result<String, AssembleError> {
    let path = template_path(templates_dir, role, &image.name);
    let Ok(source) = std::fs::read_to_string(&path) else {
        return Err(AssembleError::TemplateMissing(path));
    };
    if source.trim().is_empty() {
        return Err(AssembleError::TemplateEmpty(path));
    }

    let mut params = group_params.clone();
    let key_base = image.name.to_uppercase();
    params.insert(format!("{key_base}_IMAGE"), Value::Scalar(image.name.clone()));
    params.insert(format!("{key_base}_TAG"), Value::Scalar(image.version.clone()));
    if conf_file.is_file() {
        params.insert(
            format!("{key_base}_CONF"),
            Value::Scalar(conf_file.display().to_string()),
        );
    }

    let mut context = tera::Context::new();
    context.insert("env", &params);
    tera::Tera::one_off(&source, &context, false)
        .map_err(|source| AssembleError::Render { role, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, version: &str) -> ResolvedImage {
        ResolvedImage { name: name.to_string(), version: version.to_string() }
    }

    #[test]
    fn training_engine_selects_specialized_template() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        // A generic template of the same name also exists; it must lose.
        std::fs::write(dir.path().join("jfit_te.yaml.j2"), "generic").expect("write");
        std::fs::write(dir.path().join("jfit_te_training.yaml.j2"), "specialized").expect("write");

        let path = template_path(dir.path(), Role::TrainingEngine, "jfit_te");
        assert_eq!(path, dir.path().join("jfit_te_training.yaml.j2"));

        let rendered = render(
            Role::TrainingEngine,
            &image("jfit_te", "2.0"),
            &BTreeMap::new(),
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect("render");
        assert_eq!(rendered, "specialized");
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let err = render(
            Role::RuleEngine,
            &image("jfit_re", "1.2"),
            &BTreeMap::new(),
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect_err("expected Err");
        assert!(matches!(err, AssembleError::TemplateMissing(_)));
    }

    #[test]
    fn empty_template_is_an_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("jfit_re.yaml.j2"), "  \n").expect("write");
        let err = render(
            Role::RuleEngine,
            &image("jfit_re", "1.2"),
            &BTreeMap::new(),
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect_err("expected Err");
        assert!(matches!(err, AssembleError::TemplateEmpty(_)));
    }

    #[test]
    fn renders_image_tag_and_group_params() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("jfit_re.yaml.j2"),
            "image: {{ env.JFIT_RE_IMAGE }}:{{ env.JFIT_RE_TAG }}\nport: {{ env.PORT }}\n",
        )
        .expect("write");

        let mut params = BTreeMap::new();
        params.insert("PORT".to_string(), Value::Scalar("3000".to_string()));

        let rendered = render(
            Role::RuleEngine,
            &image("jfit_re", "1.2"),
            &params,
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect("render");
        assert_eq!(rendered, "image: jfit_re:1.2\nport: 3000\n");
    }

    #[test]
    fn conf_key_only_set_when_file_exists() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("jfit_re.yaml.j2"),
            "{% if env.JFIT_RE_CONF %}conf: {{ env.JFIT_RE_CONF }}{% else %}no-conf{% endif %}",
        )
        .expect("write");

        let rendered = render(
            Role::RuleEngine,
            &image("jfit_re", "1.2"),
            &BTreeMap::new(),
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect("render");
        assert_eq!(rendered, "no-conf");

        let conf = dir.path().join("re.conf");
        std::fs::write(&conf, "k=v").expect("write conf");
        let rendered = render(
            Role::RuleEngine,
            &image("jfit_re", "1.2"),
            &BTreeMap::new(),
            &conf,
            dir.path(),
        )
        .expect("render");
        assert_eq!(rendered, format!("conf: {}", conf.display()));
    }

    #[test]
    fn list_params_are_iterable() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("jfit_db.yaml.j2"),
            "{% for d in env.DEVICE_LIST %}{{ d }};{% endfor %}",
        )
        .expect("write");

        let mut params = BTreeMap::new();
        params.insert(
            "DEVICE_LIST".to_string(),
            Value::List(vec!["r1".into(), "r2".into()]),
        );

        let rendered = render(
            Role::Database,
            &image("jfit_db", "3.0"),
            &params,
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect("render");
        assert_eq!(rendered, "r1;r2;");
    }

    #[test]
    fn undefined_reference_is_a_render_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("jfit_re.yaml.j2"), "{{ env.NOT_SET }}").expect("write");
        let err = render(
            Role::RuleEngine,
            &image("jfit_re", "1.2"),
            &BTreeMap::new(),
            Path::new("/nonexistent.conf"),
            dir.path(),
        )
        .expect_err("expected Err");
        assert!(matches!(err, AssembleError::Render { role: Role::RuleEngine, .. }));
    }

    #[test]
    fn conf_path_strips_packaging_prefix() {
        let path = conf_path(Path::new("/out/g1"), Role::RuleEngine, "jfit_re");
        assert_eq!(path, Path::new("/out/g1/rule_engine/re.conf"));
    }
}
