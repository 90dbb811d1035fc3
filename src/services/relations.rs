// src/services/relations.rs

// Registro de relações para o `include`: qual campo aponta para qual
// módulo, e com que nome o registro relacionado é embutido.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Nome pedido no `include` (ex: `m_gen`), válido para qualquer módulo
    pub include: String,
    /// Tentadas em ordem; a primeira que resolve ganha
    pub foreign_keys: Vec<String>,
    pub target_module: String,
    pub embed_as: String,
}

impl Relation {
    pub fn new(include: &str, foreign_key: &str, target_module: &str, embed_as: &str) -> Self {
        Self::first_of(include, &[foreign_key], target_module, embed_as)
    }

    pub fn first_of(
        include: &str,
        foreign_keys: &[&str],
        target_module: &str,
        embed_as: &str,
    ) -> Self {
        Self {
            include: include.to_string(),
            foreign_keys: foreign_keys.iter().map(|k| k.to_string()).collect(),
            target_module: target_module.to_string(),
            embed_as: embed_as.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    relations: Vec<Relation>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Relações do painel: penghuni e os vários campos que apontam para `gen`.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Relation::new("m_penghuni", "m_penghuni_id", "penghuni", "m_penghuni"))
            .register(Relation::new("m_gen", "jabatan_id", "gen", "jabatan"))
            .register(Relation::new("m_gen", "divisi_id", "gen", "divisi"))
            .register(Relation::new("m_gen", "agama_id", "gen", "agama"))
            .register(Relation::new("m_gen", "gereja_id", "gen", "gereja"))
            .register(Relation::new(
                "m_gen",
                "tingkat_ketergantungan_id",
                "gen",
                "tingkat_ketergantungan",
            ))
            .register(Relation::new("m_gen", "kategori_id", "gen", "kategori"))
            .register(Relation::first_of(
                "m_gen",
                &["m_gen_id", "status_id", "jenis_transaksi_id", "kategori"],
                "gen",
                "m_gen",
            ))
    }

    /// Relações aplicáveis ao módulo para os includes pedidos. Nomes desconhecidos são ignorados.
    pub fn resolve(&self, includes: &[String]) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|relation| includes.iter().any(|inc| *inc == relation.include))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_includes_resolve_to_nothing() {
        let registry = RelationRegistry::with_defaults();
        assert!(registry.resolve(&["t_angpao_d".to_string()]).is_empty());
    }

    #[test]
    fn m_gen_expands_to_every_gen_relation() {
        let registry = RelationRegistry::with_defaults();
        let found = registry.resolve(&["m_gen".to_string()]);
        let embeds: Vec<&str> = found.iter().map(|r| r.embed_as.as_str()).collect();
        assert_eq!(
            embeds,
            vec!["jabatan", "divisi", "agama", "gereja", "tingkat_ketergantungan", "kategori", "m_gen"]
        );
    }
}
