//! End-to-end frames through the software path: vertex stage -> rasterizer ->
//! shading -> frame buffer.
use std::f32::consts::PI;
use std::sync::Arc;

use approx::assert_relative_eq;
use dual_rasterizer::core::color::SOFTWARE_CLEAR;
use dual_rasterizer::core::geometry::Vertex;
use dual_rasterizer::core::pipeline::{Filtering, RenderMode, RenderSettings, ShadingMode, Toggle};
use dual_rasterizer::pipeline::renderer::Renderer;
use dual_rasterizer::pipeline::shader::{AMBIENT, LIGHT_DIRECTION, LIGHT_INTENSITY};
use dual_rasterizer::scene::camera::{Camera, CameraInput};
use dual_rasterizer::scene::context::Scene;
use dual_rasterizer::scene::material::{Effect, MaterialMaps};
use dual_rasterizer::scene::mesh::{Mesh, Topology};
use dual_rasterizer::scene::texture::Texture;
use image::{DynamicImage, Rgb, RgbImage};
use nalgebra::{Point3, Vector2, Vector3};

const SIZE: usize = 100;
/// Inside every triangle built by `triangle_at` for z in [0, 2].
const INSIDE: (usize, usize) = (50, 60);

fn camera() -> Camera {
    Camera::new(45.0, Point3::new(0.0, 0.0, -5.0), 1.0)
}

fn triangle_at(z: f32, normal: Vector3<f32>, color: Vector3<f32>) -> Mesh {
    let tangent = Vector3::x();
    let vertices = vec![
        Vertex::new(Point3::new(0.0, 1.0, z), Vector2::new(0.5, 0.0), normal, tangent),
        Vertex::new(Point3::new(1.0, -1.0, z), Vector2::new(1.0, 1.0), normal, tangent),
        Vertex::new(Point3::new(-1.0, -1.0, z), Vector2::new(0.0, 1.0), normal, tangent),
    ];
    let maps = MaterialMaps::new(Arc::new(Texture::solid(color)));
    Mesh::new(vertices, vec![0, 1, 2], Topology::List, Effect::opaque(maps)).unwrap()
}

fn facing_camera(z: f32, color: Vector3<f32>) -> Mesh {
    triangle_at(z, Vector3::new(0.0, 0.0, -1.0), color)
}

fn render(meshes: Vec<Mesh>, settings: RenderSettings) -> Renderer {
    let mut scene = Scene::new(camera(), meshes);
    let mut renderer = Renderer::new(SIZE, SIZE, settings);
    renderer.render_frame(&mut scene).unwrap();
    renderer
}

fn drawn_pixels(renderer: &Renderer) -> usize {
    renderer
        .framebuffer
        .depth_buffer()
        .iter()
        .filter(|&&d| d < f32::MAX)
        .count()
}

#[test]
fn combined_shading_of_a_single_white_lit_triangle() {
    // 51/255 survives the 8-bit texture exactly and keeps the result below 1.
    let gray = 51.0 / 255.0;
    let renderer = render(
        vec![facing_camera(0.0, Vector3::repeat(gray))],
        RenderSettings::default(),
    );

    let observed_area = Vector3::new(0.0, 0.0, -1.0).dot(&-LIGHT_DIRECTION);
    let expected = Vector3::repeat(gray * LIGHT_INTENSITY / PI * observed_area) + AMBIENT;

    let color = renderer.framebuffer.get_pixel(INSIDE.0, INSIDE.1).unwrap();
    assert_relative_eq!(color, expected, epsilon = 1e-5);
    assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(SOFTWARE_CLEAR));
}

#[test]
fn over_bright_results_are_normalized_not_clipped() {
    let renderer = render(
        vec![facing_camera(0.0, Vector3::new(1.0, 0.5, 0.0))],
        RenderSettings::default(),
    );

    let color = renderer.framebuffer.get_pixel(INSIDE.0, INSIDE.1).unwrap();
    assert_relative_eq!(color.x, 1.0, epsilon = 1e-6);
    // Hue is kept: green stays about half of red (ambient shifts it slightly).
    assert!(color.y > 0.45 && color.y < 0.55);
}

#[test]
fn white_diffuse_saturates_to_white() {
    let renderer = render(
        vec![facing_camera(0.0, Vector3::repeat(1.0))],
        RenderSettings::default(),
    );

    // 7/pi * 0.577 + 0.025 is above one in every channel; dividing by the
    // largest channel gives pure white.
    let color = renderer.framebuffer.get_pixel(INSIDE.0, INSIDE.1).unwrap();
    assert_relative_eq!(color, Vector3::repeat(1.0), epsilon = 1e-6);
    let offset = (INSIDE.1 * SIZE + INSIDE.0) * 3;
    assert_eq!(renderer.framebuffer.to_rgb8()[offset..offset + 3], [255, 255, 255]);
}

#[test]
fn software_frames_ignore_the_filtering_mode() {
    // Left half red, right half blue: bilinear lookups in the middle would mix them.
    let mut img = RgbImage::from_pixel(2, 1, Rgb([255, 0, 0]));
    img.put_pixel(1, 0, Rgb([0, 0, 255]));
    let texture = Arc::new(Texture::from_image(DynamicImage::ImageRgb8(img)));
    let split = || {
        let mut mesh = facing_camera(0.0, Vector3::repeat(1.0));
        mesh.effect.set_material_maps(MaterialMaps::new(texture.clone()));
        mesh
    };

    let mut settings = RenderSettings::default();
    settings.apply(Toggle::ShadingMode);
    settings.apply(Toggle::ShadingMode);
    let point = render(vec![split()], settings.clone());

    // Filtering only cycles in hardware mode; switch there and back.
    settings.apply(Toggle::RenderMode);
    settings.apply(Toggle::Filtering);
    settings.apply(Toggle::RenderMode);
    assert_eq!(settings.render_mode, RenderMode::Software);
    assert_eq!(settings.filtering, Filtering::Linear);
    let linear = render(vec![split()], settings);

    assert_eq!(point.framebuffer.to_rgb8(), linear.framebuffer.to_rgb8());
    // Nearest lookup at u < 1 reads the red texel only.
    let color = linear.framebuffer.get_pixel(INSIDE.0, INSIDE.1).unwrap();
    assert!(color.x > 0.0);
    assert_eq!(color.z, 0.0);
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let mut settings = RenderSettings::default();
    settings.apply(Toggle::ShadingMode);
    settings.apply(Toggle::ShadingMode);
    assert_eq!(settings.shading_mode, ShadingMode::Diffuse);

    let near = || facing_camera(0.0, Vector3::new(0.8, 0.0, 0.0));
    let far = || facing_camera(2.0, Vector3::new(0.0, 0.0, 0.8));

    let alone = render(vec![near()], settings.clone());
    let near_first = render(vec![near(), far()], settings.clone());
    let far_first = render(vec![far(), near()], settings);

    let (x, y) = INSIDE;
    let expected_depth = alone.framebuffer.get_depth(x, y).unwrap();
    let expected_color = alone.framebuffer.get_pixel(x, y).unwrap();
    assert!(expected_depth < f32::MAX);
    assert!(expected_color.x > 0.0 && expected_color.z == 0.0);

    for renderer in [&near_first, &far_first] {
        assert_eq!(renderer.framebuffer.get_depth(x, y), Some(expected_depth));
        assert_eq!(renderer.framebuffer.get_pixel(x, y), Some(expected_color));
    }
}

#[test]
fn cull_modes_on_a_back_facing_triangle() {
    // Normal along camera forward: seen from behind.
    let back_facing = || triangle_at(0.0, Vector3::z(), Vector3::repeat(1.0));
    let mut settings = RenderSettings::default();

    assert_eq!(drawn_pixels(&render(vec![back_facing()], settings.clone())), 0);

    settings.apply(Toggle::CullMode); // front
    assert!(drawn_pixels(&render(vec![back_facing()], settings.clone())) > 0);

    settings.apply(Toggle::CullMode); // none
    assert!(drawn_pixels(&render(vec![back_facing()], settings.clone())) > 0);

    settings.apply(Toggle::CullMode); // back again
    assert!(drawn_pixels(&render(vec![facing_camera(0.0, Vector3::repeat(1.0))], settings)) > 0);
}

#[test]
fn triangle_crossing_the_screen_edge_is_dropped() {
    let mut mesh = facing_camera(0.0, Vector3::repeat(1.0));
    mesh.set_position(Vector3::new(2.5, 0.0, 0.0));

    assert_eq!(drawn_pixels(&render(vec![mesh], RenderSettings::default())), 0);
}

#[test]
fn depth_visualization_replaces_shading() {
    let mut settings = RenderSettings::default();
    settings.apply(Toggle::DepthBuffer);
    let renderer = render(vec![facing_camera(0.0, Vector3::new(1.0, 0.0, 0.0))], settings);

    let color = renderer.framebuffer.get_pixel(INSIDE.0, INSIDE.1).unwrap();
    assert_eq!(color.x, color.y);
    assert_eq!(color.y, color.z);
    assert!((0.0..=1.0).contains(&color.x));
}

#[test]
fn rotation_changes_the_frame_over_time() {
    let mut scene = Scene::new(camera(), vec![facing_camera(0.0, Vector3::repeat(1.0))]);
    let mut renderer = Renderer::new(SIZE, SIZE, RenderSettings::default());

    renderer.render_frame(&mut scene).unwrap();
    let before = drawn_pixels(&renderer);

    // Most of a quarter turn: the triangle is seen nearly edge-on.
    scene.update(&CameraInput::default(), 0.9, true);
    renderer.render_frame(&mut scene).unwrap();
    let after = drawn_pixels(&renderer);

    assert!(before > 0);
    assert!(after < before);
}
