use std::sync::Arc;
use std::time::Instant;

use pollux::{
    bvh::{BvhSettings, SplitMethod},
    expect,
    integrators::IntegratorType,
    renderer::WavefrontPipeline,
    scene::BuiltinScene,
    settings::RenderSettings,
};

const BUILDS: usize = 1000;
const ITERATIONS: u32 = 16;

fn bench_build(scene: BuiltinScene, split_method: SplitMethod) {
    let settings = BvhSettings {
        split_method,
        ..BvhSettings::default()
    };
    let start = Instant::now();
    for _ in 0..BUILDS {
        let scene = expect!(scene.build(settings), "Failed to build scene");
        if scene.bvh.is_empty() {
            panic!("We only wanted to force the build to be executed!")
        }
    }
    let elapsed_ns = start.elapsed().as_nanos();
    let elapsed_ms = (elapsed_ns as f64) * 1e-6;
    let us_per_build = (elapsed_ns as f64) * 1e-3 / (BUILDS as f64);
    println!(
        "{:<20} took {:6.1} ms total, {:0.2} us per build",
        split_method.to_string(),
        elapsed_ms,
        us_per_build
    );
}

fn bench_render(scene: BuiltinScene, integrator: IntegratorType, compact_rays: bool) {
    let scene = Arc::new(expect!(
        scene.build(BvhSettings::default()),
        "Failed to build scene"
    ));
    let settings = RenderSettings {
        width: 256,
        height: 256,
        integrator,
        compact_rays,
        ..RenderSettings::default()
    };
    let mut pipeline = expect!(
        WavefrontPipeline::new(scene, settings),
        "Failed to create pipeline"
    );

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        expect!(pipeline.render_iteration(), "Render failed");
    }
    let elapsed_s = start.elapsed().as_secs_f64();
    let ms_per_iteration = elapsed_s * 1e3 / (ITERATIONS as f64);
    let mrays_per_s = (pipeline.ray_count() as f64) * 1e-6 / elapsed_s;
    println!(
        "{:<6} compact {:<5} took {:6.1} ms per iteration, {:5.2} Mrays/s",
        integrator.to_string(),
        compact_rays,
        ms_per_iteration,
        mrays_per_s
    );
}

fn main() {
    for scene in [BuiltinScene::Cornell, BuiltinScene::CornellMesh] {
        println!("{} BVH", scene);
        for split_method in [
            SplitMethod::Middle,
            SplitMethod::EqualCounts,
            SplitMethod::SurfaceAreaHeuristic,
        ] {
            bench_build(scene, split_method);
        }
    }

    for scene in [BuiltinScene::Cornell, BuiltinScene::CornellRefract] {
        println!("{} render", scene);
        for integrator in [
            IntegratorType::Naive,
            IntegratorType::Direct,
            IntegratorType::Mis,
        ] {
            for compact_rays in [false, true] {
                bench_render(scene, integrator, compact_rays);
            }
        }
    }
}
