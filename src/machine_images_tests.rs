// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `machine_images.rs`

#[cfg(test)]
mod tests {
    use crate::errors::DeployerError;
    use crate::machine_images::*;

    fn version(v: &str) -> MachineImageVersion {
        MachineImageVersion {
            version: v.to_string(),
            ..Default::default()
        }
    }

    fn image(name: &str, versions: &[&str]) -> MachineImage {
        MachineImage {
            name: name.to_string(),
            versions: versions.iter().map(|v| version(v)).collect(),
            update_strategy: None,
            ..Default::default()
        }
    }

    fn ami(region: &str, id: &str) -> RegionAmiMapping {
        RegionAmiMapping {
            name: region.to_string(),
            ami: id.to_string(),
            architecture: Some("amd64".to_string()),
        }
    }

    fn names(images: &[MachineImage]) -> Vec<&str> {
        images.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_union_by_name_sorted() {
        let general = vec![image("suse-chost", &["15.5"]), image("gardenlinux", &["1443.3"])];
        let ls = vec![image("gardenlinux", &["1312.7"]), image("ubuntu", &["22.04"])];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            machine_images_ls: &ls,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(names(&result), vec!["gardenlinux", "suse-chost", "ubuntu"]);
        let versions: Vec<&str> = result[0].versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(versions, vec!["1443.3", "1312.7"]);
    }

    #[test]
    fn test_later_source_overrides_set_fields_only() {
        let mut general_version = version("1443.3");
        general_version.classification = Some("supported".to_string());
        general_version.architectures = Some(vec!["amd64".to_string()]);
        let general = vec![MachineImage {
            name: "gardenlinux".to_string(),
            versions: vec![general_version],
            update_strategy: None,
            ..Default::default()
        }];

        let mut ls_version = version("1443.3");
        ls_version.classification = Some("preview".to_string());
        let ls = vec![MachineImage {
            name: "gardenlinux".to_string(),
            versions: vec![ls_version],
            update_strategy: None,
            ..Default::default()
        }];

        let mut provider_version = version("1443.3");
        provider_version.regions = Some(vec![ami("eu-west-1", "ami-default")]);
        let provider = vec![MachineImage {
            name: "gardenlinux".to_string(),
            versions: vec![provider_version],
            update_strategy: None,
            ..Default::default()
        }];

        let mut provider_ls_version = version("1443.3");
        provider_ls_version.regions = Some(vec![ami("eu-west-1", "ami-landscape")]);
        let provider_ls = vec![MachineImage {
            name: "gardenlinux".to_string(),
            versions: vec![provider_ls_version],
            update_strategy: None,
            ..Default::default()
        }];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            machine_images_ls: &ls,
            provider_images: &provider,
            provider_images_ls: &provider_ls,
            ..Default::default()
        })
        .unwrap();

        let merged = &result[0].versions[0];
        assert_eq!(merged.classification.as_deref(), Some("preview"));
        assert_eq!(merged.architectures, Some(vec!["amd64".to_string()]));
        assert_eq!(merged.regions, Some(vec![ami("eu-west-1", "ami-landscape")]));
    }

    #[test]
    fn test_include_filter_keeps_only_matches() {
        let general = vec![
            image("gardenlinux", &["1443.3", "1312.7"]),
            image("suse-chost", &["15.5"]),
        ];
        let include = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec!["1443.3".to_string()],
        }];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            include_filters: &include,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(names(&result), vec!["gardenlinux"]);
        assert_eq!(result[0].versions.len(), 1);
        assert_eq!(result[0].versions[0].version, "1443.3");
    }

    #[test]
    fn test_exclude_filter_without_versions_drops_image() {
        let general = vec![image("gardenlinux", &["1443.3"]), image("suse-chost", &["15.5"])];
        let exclude = vec![ImageFilter {
            name: "suse-chost".to_string(),
            versions: vec![],
        }];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            exclude_filters: &exclude,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(names(&result), vec!["gardenlinux"]);
    }

    #[test]
    fn test_conflicting_filters_rejected() {
        let general = vec![image("gardenlinux", &["1443.3"])];
        let include = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec!["1443.3".to_string()],
        }];
        let exclude = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec![],
        }];

        let err = compute_machine_images(&ImageSources {
            machine_images: &general,
            include_filters: &include,
            exclude_filters: &exclude,
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, DeployerError::Computation { .. }));
        assert!(err.to_string().contains("both included and excluded"));
    }

    #[test]
    fn test_disjoint_version_filters_do_not_conflict() {
        let general = vec![image("gardenlinux", &["1443.3", "1312.7"])];
        let include = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec!["1443.3".to_string()],
        }];
        let exclude = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec!["1312.7".to_string()],
        }];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            include_filters: &include,
            exclude_filters: &exclude,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(result[0].versions.len(), 1);
    }

    #[test]
    fn test_whole_image_include_with_version_exclude() {
        let general = vec![image("gardenlinux", &["1443.3", "1443.10.0", "1312.7"])];
        let include = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec![],
        }];
        let exclude = vec![ImageFilter {
            name: "gardenlinux".to_string(),
            versions: vec!["1443.10.0".to_string()],
        }];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            include_filters: &include,
            exclude_filters: &exclude,
            ..Default::default()
        })
        .unwrap();

        let versions: Vec<&str> = result[0].versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(versions, vec!["1443.3", "1312.7"]);
    }

    #[test]
    fn test_unmodelled_fields_merge_and_render() {
        let general: Vec<MachineImage> = serde_yaml::from_str(
            r"
- name: gardenlinux
  inPlaceUpdates: {supported: true}
  versions:
    - version: '1443.3'
      kubeletVersionConstraint: '>= 1.30'
      inPlaceUpdates: {supported: true, minVersionForUpdate: '1312.2'}
",
        )
        .unwrap();
        let ls: Vec<MachineImage> = serde_yaml::from_str(
            r"
- name: gardenlinux
  versions:
    - version: '1443.3'
      kubeletVersionConstraint: '>= 1.31'
",
        )
        .unwrap();

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            machine_images_ls: &ls,
            ..Default::default()
        })
        .unwrap();

        let rendered = serde_json::to_value(to_gardener_machine_images(&result)).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!([{
                "name": "gardenlinux",
                "inPlaceUpdates": {"supported": true},
                "versions": [{
                    "version": "1443.3",
                    "kubeletVersionConstraint": ">= 1.31",
                    "inPlaceUpdates": {"supported": true, "minVersionForUpdate": "1312.2"}
                }]
            }])
        );
    }

    #[test]
    fn test_disable_removes_image() {
        let general = vec![image("gardenlinux", &["1443.3"]), image("suse-chost", &["15.5"])];
        let disabled = vec!["suse-chost".to_string()];

        let result = compute_machine_images(&ImageSources {
            machine_images: &general,
            disabled: &disabled,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(names(&result), vec!["gardenlinux"]);
    }

    #[test]
    fn test_disable_unknown_image_rejected() {
        let general = vec![image("gardenlinux", &["1443.3"])];
        let disabled = vec!["coreos".to_string()];

        let err = compute_machine_images(&ImageSources {
            machine_images: &general,
            disabled: &disabled,
            ..Default::default()
        })
        .unwrap_err();

        assert!(err.to_string().contains("coreos"));
    }

    #[test]
    fn test_gardener_rendering_drops_provider_data() {
        let mut v = version("1443.3");
        v.regions = Some(vec![ami("eu-west-1", "ami-1")]);
        v.classification = Some("supported".to_string());
        let images = vec![MachineImage {
            name: "gardenlinux".to_string(),
            versions: vec![v],
            update_strategy: Some("major".to_string()),
            ..Default::default()
        }];

        let rendered = to_gardener_machine_images(&images);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].update_strategy.as_deref(), Some("major"));
        assert_eq!(rendered[0].versions[0].version, "1443.3");
        assert_eq!(
            rendered[0].versions[0].classification.as_deref(),
            Some("supported")
        );

        let json = serde_json::to_value(&rendered).unwrap();
        assert!(json[0]["versions"][0].get("regions").is_none());
    }

    #[test]
    fn test_provider_config_rendering() {
        let mut v = version("1443.3");
        v.regions = Some(vec![ami("eu-west-1", "ami-1")]);
        let images = vec![
            MachineImage {
                name: "gardenlinux".to_string(),
                versions: vec![v],
                update_strategy: None,
                ..Default::default()
            },
            image("suse-chost", &["15.5"]),
        ];

        let config = to_provider_config(&images).unwrap();

        assert_eq!(
            config["apiVersion"],
            "aws.provider.extensions.gardener.cloud/v1alpha1"
        );
        assert_eq!(config["kind"], "CloudProfileConfig");
        assert_eq!(config["machineImages"][0]["name"], "gardenlinux");
        assert_eq!(
            config["machineImages"][0]["versions"][0]["regions"][0]["ami"],
            "ami-1"
        );
        assert_eq!(
            config["machineImages"][1]["versions"][0]["regions"],
            serde_json::json!([])
        );
    }
}
