//! Built-in directive handlers.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::context::{BuildContext, IMAGE_ID, IMAGE_NAME, TAGGED_IMAGE_NAME};
use crate::directive::Registry;
use crate::docker::DockerCli;
use crate::error::DfxError;
use crate::image::split_image_tag;

pub const DEFAULT_TAG: &str = "latest";

pub fn register_builtins(registry: &mut Registry, docker: Arc<DockerCli>) {
    let tag_docker = Arc::clone(&docker);
    registry
        .register("TAG", move |params, ctx| tag(params, ctx, &tag_docker))
        .register("PUSH", move |params, ctx| push(params, ctx, &docker));
}

/// Work out the `name:tag` reference for `TAG [name][:tag]`.
///
/// Without a name in `params` the context's `image-name` is reused with its
/// tag stripped. Without a tag, `latest` is used.
pub fn resolve_tag_target(params: Option<&str>, ctx: &BuildContext) -> Result<String, DfxError> {
    let (param_name, param_tag) = split_image_tag(params.map(str::trim).unwrap_or_default());

    let name = if param_name.is_empty() {
        let existing = ctx
            .non_empty(IMAGE_NAME)
            .ok_or_else(|| DfxError::Configuration("Image name is not set!".to_string()))?;
        split_image_tag(existing).0
    } else {
        param_name
    };

    // Both name sources are tag-free here, so an old tag is never carried over.
    let tag = param_tag.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TAG);
    Ok(format!("{name}:{tag}"))
}

/// `TAG [name][:tag]`: tag `image-id` and record `tagged-image-name`.
pub fn tag(params: Option<&str>, ctx: &mut BuildContext, docker: &DockerCli) -> Result<()> {
    let image_id = ctx.require(IMAGE_ID)?.to_string();
    let target = resolve_tag_target(params, ctx)?;

    info!("Tagging image with id {} as {}", image_id, target);
    docker.tag(&image_id, &target)?;
    ctx.set(TAGGED_IMAGE_NAME, target);
    Ok(())
}

/// `PUSH`: push `image-name`, or `tagged-image-name` when there is no name.
pub fn push(_params: Option<&str>, ctx: &mut BuildContext, docker: &DockerCli) -> Result<()> {
    let image = ctx
        .non_empty(IMAGE_NAME)
        .or_else(|| ctx.non_empty(TAGGED_IMAGE_NAME))
        .ok_or_else(|| DfxError::Configuration("Cannot push image without name!".to_string()))?
        .to_string();

    info!("Pushing image {}", image);
    docker.push(&image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_runner::testing::MockCommandRunner;

    fn ctx(pairs: &[(&str, &str)]) -> BuildContext {
        pairs.iter().copied().collect()
    }

    fn docker() -> (Arc<MockCommandRunner>, DockerCli) {
        let mock = Arc::new(MockCommandRunner::new());
        let cli = DockerCli::new(mock.clone());
        (mock, cli)
    }

    fn is_configuration_error(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<DfxError>(), Some(DfxError::Configuration(_)))
    }

    #[test]
    fn test_tag_only_keeps_existing_name() {
        let (mock, docker) = docker();
        let mut ctx = ctx(&[(IMAGE_ID, "abc"), (IMAGE_NAME, "myimg:old")]);
        tag(Some(":v2"), &mut ctx, &docker).unwrap();
        assert_eq!(ctx.get(TAGGED_IMAGE_NAME), Some("myimg:v2"));
        assert_eq!(mock.scripts(), ["docker tag abc myimg:v2"]);
    }

    #[test]
    fn test_name_in_params_overrides_context() {
        let c = ctx(&[(IMAGE_NAME, "myimg:old")]);
        assert_eq!(resolve_tag_target(Some("other:1"), &c).unwrap(), "other:1");
        assert_eq!(resolve_tag_target(Some("other"), &c).unwrap(), "other:latest");
    }

    #[test]
    fn test_existing_tag_is_not_reused() {
        let c = ctx(&[(IMAGE_NAME, "myimg:old")]);
        assert_eq!(resolve_tag_target(None, &c).unwrap(), "myimg:latest");
        assert_eq!(resolve_tag_target(Some(""), &c).unwrap(), "myimg:latest");
        assert_eq!(resolve_tag_target(Some(":"), &c).unwrap(), "myimg:latest");
    }

    #[test]
    fn test_registry_port_in_name() {
        let c = ctx(&[(IMAGE_NAME, "localhost:5000/app")]);
        assert_eq!(resolve_tag_target(Some(":dev"), &c).unwrap(), "localhost:5000/app:dev");
        assert_eq!(
            resolve_tag_target(Some("localhost:5000/other"), &c).unwrap(),
            "localhost:5000/other:latest"
        );
    }

    #[test]
    fn test_tag_without_any_name_fails() {
        let (mock, docker) = docker();
        let mut c = ctx(&[(IMAGE_ID, "abc"), (IMAGE_NAME, "")]);
        let err = tag(Some(":v1"), &mut c, &docker).unwrap_err();
        assert!(is_configuration_error(&err));
        assert!(mock.calls().is_empty());
        assert!(!c.contains(TAGGED_IMAGE_NAME));
    }

    #[test]
    fn test_tag_requires_image_id() {
        let (_, docker) = docker();
        let mut c = ctx(&[(IMAGE_NAME, "myimg")]);
        let err = tag(None, &mut c, &docker).unwrap_err();
        assert!(is_configuration_error(&err));
    }

    #[test]
    fn test_failed_docker_tag_leaves_context_alone() {
        let (mock, docker) = docker();
        mock.respond(1, "");
        let mut c = ctx(&[(IMAGE_ID, "abc"), (IMAGE_NAME, "myimg")]);
        assert!(tag(None, &mut c, &docker).is_err());
        assert!(!c.contains(TAGGED_IMAGE_NAME));
    }

    #[test]
    fn test_push_prefers_image_name() {
        let (mock, docker) = docker();
        let mut c = ctx(&[(IMAGE_NAME, "app:1"), (TAGGED_IMAGE_NAME, "app:2")]);
        push(None, &mut c, &docker).unwrap();
        assert_eq!(mock.scripts(), ["docker push app:1"]);
    }

    #[test]
    fn test_push_falls_back_to_tagged_name() {
        let (mock, docker) = docker();
        let mut c = ctx(&[(IMAGE_NAME, ""), (TAGGED_IMAGE_NAME, "app:2")]);
        push(None, &mut c, &docker).unwrap();
        assert_eq!(mock.scripts(), ["docker push app:2"]);
    }

    #[test]
    fn test_push_without_names_is_configuration_error() {
        let (mock, docker) = docker();
        for pairs in [
            &[][..],
            &[(IMAGE_NAME, "")][..],
            &[(IMAGE_NAME, ""), (TAGGED_IMAGE_NAME, "")][..],
        ] {
            let err = push(None, &mut ctx(pairs), &docker).unwrap_err();
            assert!(is_configuration_error(&err));
        }
        assert!(mock.calls().is_empty());
    }
}
