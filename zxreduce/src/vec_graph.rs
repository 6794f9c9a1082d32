// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub use crate::graph::*;
use crate::scalar::Scalar;
use std::mem;

pub type VTab<T> = Vec<Option<T>>;

/// Arena-backed graph. Vertex names are indices into the vertex table, and
/// freed indices are reused by later insertions.
#[derive(Debug, Clone)]
pub struct Graph {
    vdata: VTab<VData>,
    edata: VTab<Vec<(V, EType)>>,
    holes: Vec<V>, // places where a vertex has been deleted
    inputs: Vec<V>,
    outputs: Vec<V>,
    numv: usize,
    nume: usize,
    scalar: Scalar,
}

impl Graph {
    fn index<U>(nhd: &[(V, U)], v: V) -> Option<usize> {
        nhd.iter().position(|&(v0, _)| v == v0)
    }

    fn value<U: Copy>(nhd: &[(V, U)], v: V) -> Option<U> {
        nhd.iter().find(|&&(v0, _)| v == v0).map(|&(_, u)| u)
    }

    /// Removes vertex 't' from the adjacency map of 's'. This private method
    /// is used by remove_edge and remove_vertex to make the latter slightly
    /// more efficient.
    fn remove_half_edge(&mut self, s: V, t: V) {
        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            if let Some(i) = Graph::index(nhd, t) {
                nhd.swap_remove(i);
            }
        }
    }

    fn nhd(&self, v: V) -> &Vec<(V, EType)> {
        match self.edata.get(v) {
            Some(Some(nhd)) => nhd,
            _ => panic!("Vertex not found: {v}"),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        <Graph as GraphLike>::new()
    }
}

impl GraphLike for Graph {
    fn new() -> Graph {
        Graph {
            vdata: Vec::new(),
            edata: Vec::new(),
            holes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            numv: 0,
            nume: 0,
            scalar: Scalar::one(),
        }
    }

    fn vindex(&self) -> V {
        self.vdata.len()
    }

    fn num_vertices(&self) -> usize {
        self.numv
    }

    fn num_edges(&self) -> usize {
        self.nume
    }

    fn vertices(&self) -> impl Iterator<Item = V> {
        self.vdata
            .iter()
            .enumerate()
            .filter_map(|(v, d)| d.as_ref().map(|_| v))
    }

    fn edges(&self) -> impl Iterator<Item = (V, V, EType)> {
        self.edata.iter().enumerate().flat_map(|(v, tab)| {
            tab.iter().flat_map(move |nhd| {
                nhd.iter()
                    .filter(move |&&(v1, _)| v <= v1)
                    .map(move |&(v1, et)| (v, v1, et))
            })
        })
    }

    fn inputs(&self) -> &Vec<V> {
        &self.inputs
    }
    fn inputs_mut(&mut self) -> &mut Vec<V> {
        &mut self.inputs
    }
    fn set_inputs(&mut self, inputs: Vec<V>) {
        self.inputs = inputs;
    }
    fn outputs(&self) -> &Vec<V> {
        &self.outputs
    }
    fn outputs_mut(&mut self) -> &mut Vec<V> {
        &mut self.outputs
    }
    fn set_outputs(&mut self, outputs: Vec<V>) {
        self.outputs = outputs;
    }

    fn add_vertex(&mut self, ty: VType) -> V {
        self.add_vertex_with_data(VData {
            ty,
            ..VData::default()
        })
    }

    fn add_vertex_with_data(&mut self, d: VData) -> V {
        self.numv += 1;
        if let Some(v) = self.holes.pop() {
            self.vdata[v] = Some(d);
            self.edata[v] = Some(Vec::new());
            v
        } else {
            self.vdata.push(Some(d));
            self.edata.push(Some(Vec::new()));
            self.vdata.len() - 1
        }
    }

    fn remove_vertex(&mut self, v: V) {
        let adj = match self.edata.get_mut(v) {
            Some(e) => mem::take(e).expect("No such vertex."),
            None => panic!("No such vertex."),
        };
        self.numv -= 1;
        self.holes.push(v);
        self.vdata[v] = None;

        for (v1, _) in adj {
            self.nume -= 1;
            self.remove_half_edge(v1, v);
        }
    }

    fn add_edge_with_type(&mut self, s: V, t: V, ety: EType) {
        self.nume += 1;

        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            nhd.push((t, ety));
        } else {
            panic!("Source vertex not found");
        }

        if let Some(Some(nhd)) = self.edata.get_mut(t) {
            nhd.push((s, ety));
        } else {
            panic!("Target vertex not found");
        }
    }

    fn remove_edge(&mut self, s: V, t: V) {
        if !self.connected(s, t) {
            panic!("Edge not found: {s} -- {t}");
        }
        self.nume -= 1;
        self.remove_half_edge(s, t);
        self.remove_half_edge(t, s);
    }

    fn vertex_data(&self, v: V) -> &VData {
        match self.vdata.get(v) {
            Some(Some(d)) => d,
            _ => panic!("Vertex not found: {v}"),
        }
    }

    fn vertex_data_mut(&mut self, v: V) -> &mut VData {
        match self.vdata.get_mut(v) {
            Some(Some(d)) => d,
            _ => panic!("Vertex not found: {v}"),
        }
    }

    fn set_edge_type(&mut self, s: V, t: V, ety: EType) {
        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            let i = Graph::index(nhd, t).expect("Edge not found");
            nhd[i] = (t, ety);
        } else {
            panic!("Source vertex not found");
        }

        if let Some(Some(nhd)) = self.edata.get_mut(t) {
            let i = Graph::index(nhd, s).expect("Edge not found");
            nhd[i] = (s, ety);
        } else {
            panic!("Target vertex not found");
        }
    }

    fn edge_type_opt(&self, s: V, t: V) -> Option<EType> {
        if let Some(Some(nhd)) = self.edata.get(s) {
            Graph::value(nhd, t)
        } else {
            None
        }
    }

    fn neighbors(&self, v: V) -> impl Iterator<Item = V> {
        self.nhd(v).iter().map(|&(v1, _)| v1)
    }

    fn incident_edges(&self, v: V) -> impl Iterator<Item = (V, EType)> {
        self.nhd(v).iter().copied()
    }

    fn degree(&self, v: V) -> usize {
        self.nhd(v).len()
    }

    fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    fn scalar_mut(&mut self) -> &mut Scalar {
        &mut self.scalar
    }

    fn find_edge<F>(&self, f: F) -> Option<(V, V, EType)>
    where
        F: Fn(V, V, EType) -> bool,
    {
        self.edges().find(|&(s, t, et)| f(s, t, et))
    }

    fn find_vertex<F>(&self, f: F) -> Option<V>
    where
        F: Fn(V) -> bool,
    {
        self.vertices().find(|&v| f(v))
    }

    fn contains_vertex(&self, v: V) -> bool {
        matches!(self.vdata.get(v), Some(Some(_)))
    }
}
