//! Canonical ordering of material descriptions.

use std::cmp::Ordering;

use super::MaterialDesc;

/// A material description keyed for the material cache.
///
/// Ordering compares, in turn: type, alpha-test function, alpha-test
/// reference, blending flag, source and destination blend functions, then
/// the vertex and fragment shader paths ignoring ASCII case. The optional
/// geometry, hull and domain shader paths follow; a present path sorts
/// before an absent one. Descriptions that differ only in shader path case
/// are equal.
#[derive(Debug, Clone)]
pub struct CanonicalMaterialDesc(MaterialDesc);

impl CanonicalMaterialDesc {
    /// Returns the wrapped description.
    pub fn desc(&self) -> &MaterialDesc {
        &self.0
    }

    /// Unwraps the description.
    pub fn into_inner(self) -> MaterialDesc {
        self.0
    }
}

impl From<MaterialDesc> for CanonicalMaterialDesc {
    fn from(desc: MaterialDesc) -> Self {
        Self(desc)
    }
}

impl From<&MaterialDesc> for CanonicalMaterialDesc {
    fn from(desc: &MaterialDesc) -> Self {
        Self(desc.clone())
    }
}

impl Ord for CanonicalMaterialDesc {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for CanonicalMaterialDesc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CanonicalMaterialDesc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CanonicalMaterialDesc {}

/// Compares two descriptions in cache-key order.
pub fn canonical_cmp(a: &MaterialDesc, b: &MaterialDesc) -> Ordering {
    a.material_type
        .cmp(&b.material_type)
        .then(a.alpha_test_func.cmp(&b.alpha_test_func))
        .then_with(|| cmp_alpha_ref(a.alpha_test_ref, b.alpha_test_ref))
        .then(a.blending.cmp(&b.blending))
        .then(a.src_blend_func.cmp(&b.src_blend_func))
        .then(a.dst_blend_func.cmp(&b.dst_blend_func))
        .then_with(|| cmp_ignore_ascii_case(&a.vertex_shader_path, &b.vertex_shader_path))
        .then_with(|| cmp_ignore_ascii_case(&a.fragment_shader_path, &b.fragment_shader_path))
        .then_with(|| {
            cmp_optional_path(
                a.geometry_shader_path.as_deref(),
                b.geometry_shader_path.as_deref(),
            )
        })
        .then_with(|| {
            cmp_optional_path(a.hull_shader_path.as_deref(), b.hull_shader_path.as_deref())
        })
        .then_with(|| {
            cmp_optional_path(
                a.domain_shader_path.as_deref(),
                b.domain_shader_path.as_deref(),
            )
        })
}

// Signed zeros are one key; total_cmp alone orders -0.0 before 0.0.
fn cmp_alpha_ref(a: f32, b: f32) -> Ordering {
    let zero_signless = |v: f32| if v == 0.0 { 0.0 } else { v };
    zero_signless(a).total_cmp(&zero_signless(b))
}

fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

fn cmp_optional_path(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_ignore_ascii_case(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{AlphaTestFunc, BlendFunc, MaterialType};
    use std::collections::BTreeSet;

    fn lit(vs: &str, fs: &str) -> MaterialDesc {
        MaterialDesc::new(MaterialType::Lit, vs, fs)
    }

    #[test]
    fn test_shader_paths_ignore_case() {
        let a = CanonicalMaterialDesc::from(lit("Shaders/Simple.VS", "shaders/simple.fs"));
        let b = CanonicalMaterialDesc::from(lit("shaders/simple.vs", "SHADERS/SIMPLE.FS"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_signed_zero_alpha_ref_is_one_key() {
        let pos = lit("a.vs", "a.fs").with_alpha_test(AlphaTestFunc::Greater, 0.0);
        let neg = lit("a.vs", "a.fs").with_alpha_test(AlphaTestFunc::Greater, -0.0);
        assert_eq!(canonical_cmp(&pos, &neg), Ordering::Equal);

        let keys: BTreeSet<_> = [pos, neg].into_iter().map(CanonicalMaterialDesc::from).collect();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_type_compares_first() {
        let unlit = MaterialDesc::new(MaterialType::Unlit, "z.vs", "z.fs");
        let lit = lit("a.vs", "a.fs");
        assert_eq!(canonical_cmp(&unlit, &lit), Ordering::Less);
    }

    #[test]
    fn test_state_before_paths() {
        let a = lit("a.vs", "a.fs").with_alpha_test(AlphaTestFunc::Greater, 0.5);
        let b = lit("a.vs", "a.fs").with_alpha_test(AlphaTestFunc::Greater, 0.25);
        assert_eq!(canonical_cmp(&a, &b), Ordering::Greater);

        let blended = lit("a.vs", "a.fs").with_blending(BlendFunc::SrcAlpha, BlendFunc::One);
        let opaque = lit("b.vs", "b.fs");
        assert_eq!(canonical_cmp(&opaque, &blended), Ordering::Less);
    }

    #[test]
    fn test_optional_presence_sorts_first() {
        let with_gs = lit("a.vs", "a.fs").with_geometry_shader("a.gs");
        let without = lit("a.vs", "a.fs");
        assert_eq!(canonical_cmp(&with_gs, &without), Ordering::Less);
        assert_eq!(canonical_cmp(&without, &with_gs), Ordering::Greater);

        let upper = lit("a.vs", "a.fs").with_tessellation("A.HS", "A.DS");
        let lower = lit("a.vs", "a.fs").with_tessellation("a.hs", "a.ds");
        assert_eq!(canonical_cmp(&upper, &lower), Ordering::Equal);
    }

    #[test]
    fn test_geometry_decides_before_hull() {
        let a = lit("a.vs", "a.fs")
            .with_geometry_shader("a.gs")
            .with_tessellation("z.hs", "z.ds");
        let b = lit("a.vs", "a.fs")
            .with_geometry_shader("b.gs")
            .with_tessellation("a.hs", "a.ds");
        assert_eq!(canonical_cmp(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_ordered_set_dedups_equal_keys() {
        let mut set = BTreeSet::new();
        set.insert(CanonicalMaterialDesc::from(lit("x.vs", "x.fs")));
        set.insert(CanonicalMaterialDesc::from(lit("X.VS", "X.FS")));
        set.insert(CanonicalMaterialDesc::from(lit("y.vs", "y.fs")));
        assert_eq!(set.len(), 2);
    }
}
