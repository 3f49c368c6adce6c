#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use strum::VariantNames;

    use pollux::{
        bvh::SplitMethod,
        integrators::IntegratorType,
        materials::bsdfs::MicrofacetDistributionType,
        scene::BuiltinScene,
        settings::{InitialSettings, LogLevel, RenderSettings},
        Error,
    };

    #[test]
    fn defaults() {
        let settings = InitialSettings::from_yaml("{}").unwrap();
        assert_eq!(settings, InitialSettings::default());
        assert_eq!(settings.render, RenderSettings::default());
        assert_eq!(settings.scene.scene, BuiltinScene::Cornell);
        assert_eq!(settings.render.integrator, IntegratorType::Mis);
        assert!(settings.output.is_none());
        assert_eq!(settings.log_level, LogLevel::Info);
    }

    #[test]
    fn partial() {
        let yaml = r#"
scene:
  scene: CornellRefract
  bvh:
    split_method: Middle
render:
  width: 320
  height: 240
  integrator: Naive
  default_distribution: Beckmann
  compact_rays: false
output: out.exr
log_level: Debug
"#;
        let settings = InitialSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.scene.scene, BuiltinScene::CornellRefract);
        assert_eq!(settings.scene.bvh.split_method, SplitMethod::Middle);
        // Unset fields keep their defaults
        assert_eq!(
            settings.scene.bvh.max_primitives_in_node,
            pollux::bvh::BvhSettings::default().max_primitives_in_node
        );

        let render = settings.render;
        assert_eq!((render.width, render.height), (320, 240));
        assert_eq!(render.integrator, IntegratorType::Naive);
        assert_eq!(
            render.default_distribution,
            MicrofacetDistributionType::Beckmann
        );
        assert!(!render.compact_rays);
        assert_eq!(render.iterations, RenderSettings::default().iterations);
        assert_eq!(render.max_depth, RenderSettings::default().max_depth);

        assert_eq!(settings.output, Some(PathBuf::from("out.exr")));
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            InitialSettings::from_yaml("render:\n  integrator: Bidirectional\n"),
            Err(Error::Settings(_))
        ));
        assert!(matches!(
            InitialSettings::from_yaml("render:\n  width: -1\n"),
            Err(Error::Settings(_))
        ));
        assert!(matches!(
            InitialSettings::load(Path::new("definitely/not/here.yaml")),
            Err(Error::Open { .. })
        ));
    }

    #[test]
    fn round_trip() {
        let mut settings = InitialSettings::default();
        settings.render.seed = 1234;
        settings.render.integrator = IntegratorType::Direct;
        settings.scene.scene = BuiltinScene::CornellMesh;
        let yaml = serde_yaml::to_string(&settings).unwrap();
        assert_eq!(InitialSettings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn names() {
        assert_eq!(IntegratorType::VARIANTS, &["Naive", "Direct", "Mis"]);
        assert_eq!(
            "Direct".parse::<IntegratorType>().unwrap(),
            IntegratorType::Direct
        );
        assert!("direct".parse::<IntegratorType>().is_err());
        assert_eq!(IntegratorType::Mis.to_string(), "Mis");

        assert_eq!(
            SplitMethod::VARIANTS,
            &["Middle", "EqualCounts", "SurfaceAreaHeuristic"]
        );
        assert_eq!(
            "TrowbridgeReitz"
                .parse::<MicrofacetDistributionType>()
                .unwrap(),
            MicrofacetDistributionType::TrowbridgeReitz
        );
        assert_eq!(BuiltinScene::CornellMesh.to_string(), "CornellMesh");
    }

    #[test]
    fn log_levels() {
        assert_eq!(log::LevelFilter::from(LogLevel::Error), log::LevelFilter::Error);
        assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::Trace);
        assert_eq!("Warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    }
}
