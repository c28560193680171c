use std::path::Path;

use glam::{Affine3A, Mat4, Quat, Vec3, Vec4};

use crate::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use crate::errors::Result;
use crate::scene::{ImageData, Material, Mesh};

use super::{FragmentNode, FragmentSkin, SceneFragment};

/// Parses a `.gltf`/`.glb` file into a [`SceneFragment`].
///
/// External buffers and images are resolved relative to the file. Node
/// indices inside the fragment match the file's node indices, so skin
/// joint lists carry over unchanged; extra primitives of a multi-primitive
/// mesh become synthetic child nodes appended after the real ones.
pub fn load_gltf(path: &Path) -> Result<SceneFragment> {
    let (document, buffers, images) = gltf::import(path)?;

    let mut meshes = Vec::new();
    let mut primitive_ranges: Vec<Vec<usize>> = vec![Vec::new(); document.meshes().len()];
    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            primitive_ranges[mesh.index()].push(meshes.len());
            meshes.push(build_mesh(&mesh, &primitive, &buffers, &images));
        }
    }

    let mut nodes: Vec<FragmentNode> = document
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            FragmentNode {
                name: node_name(&node),
                translation: Vec3::from_array(t),
                rotation: Quat::from_array(r),
                scale: Vec3::from_array(s),
                parent: None,
                mesh: None,
                skin: node.skin().map(|skin| skin.index()),
            }
        })
        .collect();

    for node in document.nodes() {
        for child in node.children() {
            nodes[child.index()].parent = Some(node.index());
        }
    }

    for node in document.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        let Some((&first, rest)) = primitive_ranges[mesh.index()].split_first() else {
            continue;
        };

        nodes[node.index()].mesh = Some(first);

        let skin = nodes[node.index()].skin;
        for (i, &extra) in rest.iter().enumerate() {
            nodes.push(FragmentNode {
                name: format!("{}.primitive{}", nodes[node.index()].name, i + 1),
                translation: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
                parent: Some(node.index()),
                mesh: Some(extra),
                skin,
            });
        }
    }

    let mut skins = Vec::new();
    for skin in document.skins() {
        let reader = skin.reader(|buffer| Some(&*buffers[buffer.index()]));
        let inverse_bind_matrices: Vec<Affine3A> =
            if let Some(iter) = reader.read_inverse_bind_matrices() {
                iter.map(|m| Affine3A::from_mat4(Mat4::from_cols_array_2d(&m)))
                    .collect()
            } else {
                vec![Affine3A::IDENTITY; skin.joints().count()]
            };

        skins.push(FragmentSkin {
            name: skin.name().unwrap_or("Skeleton").to_string(),
            joints: skin.joints().map(|joint| joint.index()).collect(),
            inverse_bind_matrices,
        });
    }

    let clips = load_animations(&document, &buffers);

    log::debug!(
        "parsed {}: {} nodes, {} meshes, {} skins, {} clips",
        path.display(),
        nodes.len(),
        meshes.len(),
        skins.len(),
        clips.len()
    );

    Ok(SceneFragment {
        nodes,
        meshes,
        skins,
        clips,
    })
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string)
}

fn build_mesh(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Mesh {
    let reader = primitive.reader(|buffer| Some(&*buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(Iterator::collect)
        .unwrap_or_default();

    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()], Iterator::collect);

    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map_or_else(|| vec![[0.0; 2]; positions.len()], |r| r.into_f32().collect());

    let joints: Vec<[u16; 4]> = reader
        .read_joints(0)
        .map(|r| r.into_u16().collect())
        .unwrap_or_default();

    let weights: Vec<[f32; 4]> = reader
        .read_weights(0)
        .map(|r| r.into_f32().collect())
        .unwrap_or_default();

    // Non-indexed primitives get a trivial index buffer.
    let indices: Vec<u32> = reader.read_indices().map_or_else(
        || (0..u32::try_from(positions.len()).unwrap_or(0)).collect(),
        |r| r.into_u32().collect(),
    );

    let name = mesh
        .name()
        .map_or_else(|| format!("Mesh_{}", mesh.index()), ToString::to_string);

    Mesh {
        name,
        positions,
        normals,
        uvs,
        joints,
        weights,
        indices,
        material: build_material(&primitive.material(), images),
    }
}

fn build_material(material: &gltf::Material, images: &[gltf::image::Data]) -> Material {
    let pbr = material.pbr_metallic_roughness();

    let base_color_texture = pbr
        .base_color_texture()
        .and_then(|info| decode_image(&images[info.texture().source().index()]));

    Material {
        base_color: Vec4::from_array(pbr.base_color_factor()),
        base_color_texture,
    }
}

fn decode_image(data: &gltf::image::Data) -> Option<ImageData> {
    use gltf::image::Format;

    let rgba8 = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        other => {
            log::warn!("unsupported texture format {other:?}, ignoring texture");
            return None;
        }
    };

    Some(ImageData {
        width: data.width,
        height: data.height,
        rgba8,
    })
}

fn load_animations(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<AnimationClip> {
    let mut clips = Vec::new();

    for anim in document.animations() {
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| Some(&*buffers[buffer.index()]));
            let target = channel.target();
            let node_name = node_name(&target.node());

            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let Some(outputs) = reader.read_outputs() else {
                continue;
            };

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let track = match target.property() {
                gltf::animation::Property::Translation => {
                    let gltf::animation::util::ReadOutputs::Translations(iter) = outputs else {
                        continue;
                    };
                    Track {
                        meta: TrackMeta {
                            node_name,
                            target: TargetPath::Translation,
                        },
                        data: TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    }
                }
                gltf::animation::Property::Rotation => {
                    let gltf::animation::util::ReadOutputs::Rotations(iter) = outputs else {
                        continue;
                    };
                    Track {
                        meta: TrackMeta {
                            node_name,
                            target: TargetPath::Rotation,
                        },
                        data: TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    }
                }
                gltf::animation::Property::Scale => {
                    let gltf::animation::util::ReadOutputs::Scales(iter) = outputs else {
                        continue;
                    };
                    Track {
                        meta: TrackMeta {
                            node_name,
                            target: TargetPath::Scale,
                        },
                        data: TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    }
                }
                // Morph target weights are out of scope for this viewer.
                gltf::animation::Property::MorphTargetWeights => continue,
            };

            tracks.push(track);
        }

        let name = anim
            .name()
            .map_or_else(|| format!("Animation_{}", anim.index()), ToString::to_string);
        clips.push(AnimationClip::new(name, tracks));
    }

    clips
}
